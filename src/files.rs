//! Search/replace of version strings in configured files.
//!
//! Every occurrence of the search string in a file is replaced. All targets
//! are searched before anything is written, so a missing search string never
//! leaves earlier files modified.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::domain::{Version, VersionPattern};
use crate::error::{BumpvError, Result};
use crate::template::Template;

/// Default search template
pub const DEFAULT_SEARCH: &str = "{current_version}";

/// Default replace template
pub const DEFAULT_REPLACE: &str = "{new_version}";

/// A file whose version string is rewritten on bump
#[derive(Debug, Clone)]
pub struct FileTarget {
    pub path: PathBuf,
    pub search: String,
    pub replace: String,
    /// File-local pattern used to serialize the version for this file only
    pub pattern: Option<Arc<VersionPattern>>,
}

impl FileTarget {
    /// Target using the default search and replace templates
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTarget {
            path: path.into(),
            search: DEFAULT_SEARCH.to_string(),
            replace: DEFAULT_REPLACE.to_string(),
            pattern: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_replace(mut self, replace: impl Into<String>) -> Self {
        self.replace = replace.into();
        self
    }

    pub fn with_pattern(mut self, pattern: Arc<VersionPattern>) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Template context for this file, with both versions serialized through
    /// the file's own pattern when it has one.
    fn context(&self, current: &Version, new: &Version) -> Result<HashMap<String, String>> {
        let (current_version, new_version) = match &self.pattern {
            Some(pattern) => (
                pattern.serialize_named(&current.to_map())?,
                pattern.serialize_named(&new.to_map())?,
            ),
            None => (current.serialize()?, new.serialize()?),
        };

        Ok(version_context(current, new, current_version, new_version))
    }
}

/// Template context shared by search/replace and commit messages:
/// `current_version`, `new_version` and every present component as
/// `current_<name>` / `new_<name>`.
pub(crate) fn version_context(
    current: &Version,
    new: &Version,
    current_version: String,
    new_version: String,
) -> HashMap<String, String> {
    let mut context = HashMap::new();
    for (name, value) in current.to_map() {
        context.insert(format!("current_{}", name), value);
    }
    for (name, value) in new.to_map() {
        context.insert(format!("new_{}", name), value);
    }
    context.insert("current_version".to_string(), current_version);
    context.insert("new_version".to_string(), new_version);
    context
}

/// Outcome of rewriting one target
#[derive(Debug, Clone, PartialEq)]
pub struct FileChange {
    pub path: PathBuf,
    pub search: String,
    pub replace: String,
    pub original: String,
    pub updated: String,
    pub replacements: usize,
}

impl FileChange {
    /// `(old, new)` pairs for lines that differ.
    ///
    /// When the line count changed the whole contents are returned as one
    /// pair.
    pub fn changed_lines(&self) -> Vec<(&str, &str)> {
        let old: Vec<&str> = self.original.lines().collect();
        let new: Vec<&str> = self.updated.lines().collect();
        if old.len() != new.len() {
            return vec![(self.original.as_str(), self.updated.as_str())];
        }
        old.into_iter()
            .zip(new)
            .filter(|(a, b)| a != b)
            .collect()
    }
}

/// Rewrites the configured files from one version to the next
pub struct FileUpdater<'a> {
    targets: &'a [FileTarget],
    current: &'a Version,
    new: &'a Version,
}

impl<'a> FileUpdater<'a> {
    pub fn new(targets: &'a [FileTarget], current: &'a Version, new: &'a Version) -> Self {
        FileUpdater {
            targets,
            current,
            new,
        }
    }

    /// Compute every change without touching the filesystem.
    ///
    /// Targets sharing a path are applied in order on the same contents.
    pub fn preview(&self) -> Result<Vec<FileChange>> {
        let mut pending: HashMap<&Path, String> = HashMap::new();
        let mut changes = Vec::with_capacity(self.targets.len());

        for target in self.targets {
            let context = target.context(self.current, self.new)?;
            let search = Template::parse(&target.search)?.render(&context)?;
            let replace = Template::parse(&target.replace)?.render(&context)?;
            if search.is_empty() {
                return Err(BumpvError::template(&target.search, "search string is empty"));
            }

            let original = match pending.get(target.path.as_path()) {
                Some(contents) => contents.clone(),
                None => read_target(&target.path)?,
            };

            let replacements = original.matches(search.as_str()).count();
            if replacements == 0 {
                return Err(BumpvError::SearchNotFound {
                    path: target.path.clone(),
                    search,
                });
            }

            let updated = original.replace(search.as_str(), &replace);
            pending.insert(target.path.as_path(), updated.clone());
            changes.push(FileChange {
                path: target.path.clone(),
                search,
                replace,
                original,
                updated,
                replacements,
            });
        }

        Ok(changes)
    }

    /// Preview, then write the results unless `dry_run` is set.
    ///
    /// Each file is replaced atomically. If a write fails the error lists the
    /// files already written.
    pub fn replace(&self, dry_run: bool) -> Result<Vec<FileChange>> {
        let changes = self.preview()?;
        if !dry_run {
            write_changes(&changes, write_atomic)?;
        }
        Ok(changes)
    }
}

/// Write the final contents of every changed path once, in first-seen order.
///
/// Returns the written paths. On failure the error carries the paths
/// written before it.
fn write_changes<W>(changes: &[FileChange], mut write: W) -> Result<Vec<PathBuf>>
where
    W: FnMut(&Path, &str) -> io::Result<()>,
{
    // Last change per path holds that file's final contents.
    let mut order: Vec<&Path> = Vec::new();
    let mut finals: HashMap<&Path, &str> = HashMap::new();
    for change in changes {
        if finals.insert(change.path.as_path(), &change.updated).is_none() {
            order.push(change.path.as_path());
        }
    }

    let mut written: Vec<PathBuf> = Vec::new();
    for path in order {
        write(path, finals[path]).map_err(|source| BumpvError::FileWrite {
            path: path.to_path_buf(),
            source,
            written: written.clone(),
        })?;
        written.push(path.to_path_buf());
    }

    Ok(written)
}

fn read_target(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| BumpvError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a temporary file in the same directory, then rename.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
