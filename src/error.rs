use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for bumpv operations
#[derive(Error, Debug)]
pub enum BumpvError {
    #[error("Version '{version}' does not match pattern '{pattern}'")]
    Parse { version: String, pattern: String },

    #[error(
        "None of the serialize templates {templates:?} can be satisfied with components {available:?}"
    )]
    Serialize {
        templates: Vec<String>,
        available: Vec<String>,
    },

    #[error("Invalid parse pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unknown version part '{part}', expected one of: {}", .valid.join(", "))]
    UnknownPart { part: String, valid: Vec<String> },

    #[error("Version part '{part}' has value '{value}' which cannot be incremented")]
    NonNumericPart { part: String, value: String },

    #[error("Version part '{part}' is already at its last value '{value}' (values: {values:?})")]
    PartExhausted {
        part: String,
        value: String,
        values: Vec<String>,
    },

    #[error("Template error in '{template}': {reason}")]
    Template { template: String, reason: String },

    #[error("Did not find '{search}' in file: {}", .path.display())]
    SearchNotFound { path: PathBuf, search: String },

    #[error("Cannot read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Cannot write file {}: {source} (already written: {})",
        .path.display(),
        display_paths(.written)
    )]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        written: Vec<PathBuf>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Working directory is dirty: {}", .files.join(", "))]
    DirtyWorkingDirectory { files: Vec<String> },

    #[error("Tag '{tag}' already exists")]
    TagExists { tag: String },

    #[error(
        "Stopped after updating files to {new_version}: {source} (files written: {}; config written: {config_written}; committed: {committed})",
        display_paths(.written)
    )]
    IncompleteRun {
        new_version: String,
        written: Vec<PathBuf>,
        config_written: bool,
        committed: bool,
        #[source]
        source: Box<BumpvError>,
    },

    #[error("Git operation failed: {0}")]
    Vcs(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML edit error: {0}")]
    TomlEdit(#[from] toml_edit::TomlError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience type alias for Results in bumpv
pub type Result<T> = std::result::Result<T, BumpvError>;

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "none".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl BumpvError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpvError::Config(msg.into())
    }

    /// Create a template error for the given template text
    pub fn template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        BumpvError::Template {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the configuration rather than the run itself.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            BumpvError::Serialize { .. }
                | BumpvError::InvalidPattern { .. }
                | BumpvError::Template { .. }
                | BumpvError::Config(_)
                | BumpvError::Toml(_)
                | BumpvError::TomlEdit(_)
        )
    }
}
