use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::vcs::Vcs;

/// Mock VCS for testing without actual git operations
///
/// Records every staged path, commit message and tag so tests can assert on
/// what the workflow asked for.
#[derive(Debug, Default)]
pub struct MockVcs {
    dirty: Vec<String>,
    fail_commit: bool,
    staged: RefCell<Vec<PathBuf>>,
    commits: RefCell<Vec<String>>,
    tags: RefCell<Vec<String>>,
}

impl MockVcs {
    /// Create a new clean mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Report these files as modified
    pub fn with_dirty_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirty = files.into_iter().map(Into::into).collect();
        self
    }

    /// Start with these tags already present
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.borrow_mut().extend(tags.into_iter().map(Into::into));
        self
    }

    /// Make every commit fail
    pub fn with_commit_failure(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn staged(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }

    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }
}

impl Vcs for MockVcs {
    fn dirty_files(&self) -> Result<Vec<String>> {
        Ok(self.dirty.clone())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().iter().any(|t| t == name))
    }

    fn add_path(&self, path: &Path) -> Result<()> {
        self.staged.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        if self.fail_commit {
            return Err(git2::Error::from_str("commit rejected").into());
        }
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn tag(&self, name: &str) -> Result<()> {
        let mut tags = self.tags.borrow_mut();
        if tags.iter().any(|t| t == name) {
            return Err(git2::Error::from_str(&format!("tag '{}' already exists", name)).into());
        }
        tags.push(name.to_string());
        Ok(())
    }
}
