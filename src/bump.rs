//! Sequencing of a single bump: compute the new version, rewrite files and
//! describe the commit and tag a VCS should create.
//!
//! Nothing here talks to git or prints; the caller acts on [`BumpResult`].

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::Version;
use crate::error::Result;
use crate::files::{version_context, FileChange, FileTarget, FileUpdater};
use crate::template;

/// Default tag name template
pub const DEFAULT_TAG_NAME: &str = "v{new_version}";

/// Default commit message template
pub const DEFAULT_MESSAGE: &str = "Bump version: {current_version} → {new_version}";

/// Files to stage and the message to commit them with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRequest {
    pub paths: Vec<PathBuf>,
    pub message: String,
}

/// Outcome of a bump
#[derive(Debug, Clone, Serialize)]
pub struct BumpResult {
    pub old_version: String,
    pub new_version: String,
    pub tag: String,

    #[serde(skip)]
    pub changes: Vec<FileChange>,

    /// Present when a commit was requested
    #[serde(skip)]
    pub commit: Option<CommitRequest>,

    /// Whether `tag` should be created
    #[serde(skip)]
    pub create_tag: bool,

    #[serde(skip)]
    pub dry_run: bool,
}

impl BumpResult {
    /// Paths of every file touched, each listed once
    pub fn changed_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for change in &self.changes {
            if !paths.contains(&change.path) {
                paths.push(change.path.clone());
            }
        }
        paths
    }
}

/// Runs a bump from a resolved current version and file list
#[derive(Debug, Clone)]
pub struct BumpOrchestrator {
    current: Version,
    files: Vec<FileTarget>,
    commit: bool,
    tag: bool,
    tag_name: String,
    message: String,
}

impl BumpOrchestrator {
    pub fn new(current: Version, files: Vec<FileTarget>) -> Self {
        BumpOrchestrator {
            current,
            files,
            commit: false,
            tag: false,
            tag_name: DEFAULT_TAG_NAME.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    pub fn with_commit(mut self, commit: bool, message: impl Into<String>) -> Self {
        self.commit = commit;
        self.message = message.into();
        self
    }

    pub fn with_tag(mut self, tag: bool, tag_name: impl Into<String>) -> Self {
        self.tag = tag;
        self.tag_name = tag_name.into();
        self
    }

    pub fn current_version(&self) -> &Version {
        &self.current
    }

    pub fn files(&self) -> &[FileTarget] {
        &self.files
    }

    /// Tag name a run bumping `part` would create, without touching files.
    pub fn next_tag(&self, part: &str) -> Result<String> {
        self.current.bump(part)?.get_tag(&self.tag_name)
    }

    /// Bump `part` and rewrite every configured file.
    ///
    /// Serialization and template errors surface before any file is read.
    pub fn run(&self, part: &str, dry_run: bool) -> Result<BumpResult> {
        let new = self.current.bump(part)?;
        let old_version = self.current.serialize()?;
        let new_version = new.serialize()?;
        let tag = new.get_tag(&self.tag_name)?;
        let message = if self.commit {
            Some(self.commit_message(&new, &old_version, &new_version)?)
        } else {
            None
        };

        let changes = FileUpdater::new(&self.files, &self.current, &new).replace(dry_run)?;

        let mut result = BumpResult {
            old_version,
            new_version,
            tag,
            changes,
            commit: None,
            create_tag: self.tag,
            dry_run,
        };
        if let Some(message) = message {
            result.commit = Some(CommitRequest {
                paths: result.changed_paths(),
                message,
            });
        }
        Ok(result)
    }

    fn commit_message(&self, new: &Version, old_version: &str, new_version: &str) -> Result<String> {
        let context = version_context(
            &self.current,
            new,
            old_version.to_string(),
            new_version.to_string(),
        );
        template::format(&self.message, &context)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::{DEFAULT_PARSE, DEFAULT_SERIALIZE};
    use crate::error::BumpvError;

    fn current(raw: &str) -> Version {
        Version::from_config(raw, DEFAULT_PARSE, &[DEFAULT_SERIALIZE]).unwrap()
    }

    #[test]
    fn test_run_without_files() {
        let result = BumpOrchestrator::new(current("1.2.3"), vec![])
            .run("minor", false)
            .unwrap();
        assert_eq!(result.old_version, "1.2.3");
        assert_eq!(result.new_version, "1.3.0");
        assert_eq!(result.tag, "v1.3.0");
        assert!(result.commit.is_none());
        assert!(!result.create_tag);
    }

    #[test]
    fn test_run_rewrites_files_and_requests_commit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, "1.2.3\n").unwrap();

        let result = BumpOrchestrator::new(current("1.2.3"), vec![FileTarget::new(&path)])
            .with_commit(true, DEFAULT_MESSAGE)
            .with_tag(true, "release-{new_version}")
            .run("major", false)
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "2.0.0\n");
        let commit = result.commit.unwrap();
        assert_eq!(commit.paths, vec![path]);
        assert_eq!(commit.message, "Bump version: 1.2.3 → 2.0.0");
        assert!(result.create_tag);
        assert_eq!(result.tag, "release-2.0.0");
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, "1.2.3\n").unwrap();

        let result = BumpOrchestrator::new(current("1.2.3"), vec![FileTarget::new(&path)])
            .run("patch", true)
            .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.changes[0].updated, "1.2.4\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "1.2.3\n");
    }

    #[test]
    fn test_search_not_found_propagates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, "0.9.0\n").unwrap();

        let err = BumpOrchestrator::new(current("1.2.3"), vec![FileTarget::new(&path)])
            .with_commit(true, DEFAULT_MESSAGE)
            .run("patch", false)
            .unwrap_err();

        assert!(matches!(err, BumpvError::SearchNotFound { .. }));
    }

    #[test]
    fn test_bad_message_template_fails_before_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");
        fs::write(&path, "1.2.3\n").unwrap();

        let err = BumpOrchestrator::new(current("1.2.3"), vec![FileTarget::new(&path)])
            .with_commit(true, "Release {version}")
            .run("patch", false)
            .unwrap_err();

        assert!(matches!(err, BumpvError::Template { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "1.2.3\n");
    }

    #[test]
    fn test_message_sees_components() {
        let result = BumpOrchestrator::new(current("1.2.3"), vec![])
            .with_commit(true, "{current_minor} -> {new_minor}")
            .run("minor", false)
            .unwrap();
        assert_eq!(result.commit.unwrap().message, "2 -> 3");
    }

    #[test]
    fn test_next_tag_matches_run() {
        let orchestrator =
            BumpOrchestrator::new(current("1.2.3"), vec![]).with_tag(true, "release-{new_version}");
        assert_eq!(orchestrator.next_tag("minor").unwrap(), "release-1.3.0");
        assert_eq!(orchestrator.run("minor", true).unwrap().tag, "release-1.3.0");
    }

    #[test]
    fn test_result_serializes_public_fields_only() {
        let result = BumpOrchestrator::new(current("1.2.3"), vec![])
            .run("patch", true)
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"old_version": "1.2.3", "new_version": "1.2.4", "tag": "v1.2.4"})
        );
    }
}
