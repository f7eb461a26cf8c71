use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;

use crate::bump::{BumpOrchestrator, DEFAULT_MESSAGE, DEFAULT_TAG_NAME};
use crate::domain::{PartSpec, Version, VersionPattern, DEFAULT_PARSE, DEFAULT_SERIALIZE};
use crate::error::{BumpvError, Result};
use crate::files::{write_atomic, FileTarget, DEFAULT_REPLACE, DEFAULT_SEARCH};

/// Configuration file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = ".bumpv.toml";

/// Represents the complete configuration for bumpv.
///
/// Everything lives under the `[bumpv]` table; `path` records where it was
/// loaded from so relative file paths and write-back resolve against it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub bumpv: BumpvConfig,

    #[serde(skip)]
    pub path: PathBuf,
}

/// The `[bumpv]` table
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BumpvConfig {
    #[serde(default)]
    pub current_version: String,

    #[serde(default)]
    pub commit: bool,

    #[serde(default)]
    pub tag: bool,

    #[serde(default = "default_parse")]
    pub parse: String,

    #[serde(default = "default_serialize")]
    pub serialize: Templates,

    #[serde(default = "default_search")]
    pub search: String,

    #[serde(default = "default_replace")]
    pub replace: String,

    #[serde(default = "default_tag_name")]
    pub tag_name: String,

    #[serde(default = "default_message")]
    pub message: String,

    /// `[bumpv.part.<name>]` tables
    #[serde(default, rename = "part")]
    pub parts: BTreeMap<String, PartSpec>,

    /// `[[bumpv.file]]` entries, in declaration order
    #[serde(default, rename = "file")]
    pub files: Vec<FileConfig>,
}

/// One `[[bumpv.file]]` entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FileConfig {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialize: Option<Templates>,
}

/// Serialize templates, written either as a list or as one string with one
/// template per line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "StringOrList", into = "Vec<String>")]
pub struct Templates(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl From<StringOrList> for Templates {
    fn from(value: StringOrList) -> Self {
        match value {
            StringOrList::One(s) => Templates(
                s.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            StringOrList::Many(list) => Templates(list),
        }
    }
}

impl From<Templates> for Vec<String> {
    fn from(value: Templates) -> Self {
        value.0
    }
}

fn default_parse() -> String {
    DEFAULT_PARSE.to_string()
}

fn default_serialize() -> Templates {
    Templates(vec![DEFAULT_SERIALIZE.to_string()])
}

fn default_search() -> String {
    DEFAULT_SEARCH.to_string()
}

fn default_replace() -> String {
    DEFAULT_REPLACE.to_string()
}

fn default_tag_name() -> String {
    DEFAULT_TAG_NAME.to_string()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

impl Config {
    /// Parse configuration text; `path` is recorded for later resolution.
    pub fn from_toml(contents: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.path = path.into();

        if config.bumpv.current_version.trim().is_empty() {
            return Err(BumpvError::config(format!(
                "'current_version' is not set in {}",
                config.path.display()
            )));
        }
        if let Some(file) = config.bumpv.files.iter().find(|f| f.path.trim().is_empty()) {
            return Err(BumpvError::config(format!(
                "file entry with empty path in {}: {:?}",
                config.path.display(),
                file
            )));
        }

        Ok(config)
    }

    /// Directory that relative file paths are resolved against
    pub fn base_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Compile the global pattern, including per-part rules.
    pub fn version_pattern(&self) -> Result<Arc<VersionPattern>> {
        let pattern = VersionPattern::with_parts(
            &self.bumpv.parse,
            &self.bumpv.serialize.0,
            self.bumpv.parts.clone(),
        )?;
        Ok(Arc::new(pattern))
    }

    /// Parse `current_version` with the global pattern.
    pub fn current_version(&self) -> Result<Version> {
        self.version_pattern()?.parse(&self.bumpv.current_version)
    }

    /// Resolve `[[bumpv.file]]` entries into typed targets.
    ///
    /// Entries overriding `parse` or `serialize` get their own pattern, with
    /// the other setting inherited from `[bumpv]`.
    pub fn file_targets(&self) -> Result<Vec<FileTarget>> {
        self.bumpv
            .files
            .iter()
            .map(|file| -> Result<FileTarget> {
                let mut target = FileTarget::new(self.base_dir().join(&file.path))
                    .with_search(file.search.as_deref().unwrap_or(&self.bumpv.search))
                    .with_replace(file.replace.as_deref().unwrap_or(&self.bumpv.replace));

                if file.parse.is_some() || file.serialize.is_some() {
                    let parse = file.parse.as_deref().unwrap_or(&self.bumpv.parse);
                    let serialize = file.serialize.as_ref().unwrap_or(&self.bumpv.serialize);
                    let pattern =
                        VersionPattern::with_parts(parse, &serialize.0, self.bumpv.parts.clone())?;
                    target = target.with_pattern(Arc::new(pattern));
                }
                Ok(target)
            })
            .collect()
    }

    /// Part tables whose name matches no component of the parse pattern
    pub fn unused_parts(&self, pattern: &VersionPattern) -> Vec<String> {
        self.bumpv
            .parts
            .keys()
            .filter(|name| !pattern.has_component(name))
            .cloned()
            .collect()
    }

    /// Build the orchestrator for this configuration.
    ///
    /// Compiles every pattern and parses the current version, so configuration
    /// errors surface before any file is touched.
    pub fn orchestrator(&self) -> Result<BumpOrchestrator> {
        let current = self.current_version()?;
        let files = self.file_targets()?;

        Ok(BumpOrchestrator::new(current, files)
            .with_commit(self.bumpv.commit, self.bumpv.message.clone())
            .with_tag(self.bumpv.tag, self.bumpv.tag_name.clone()))
    }
}

/// Loads configuration from file.
///
/// # Arguments
/// * `config_path` - Path to the configuration file; `.bumpv.toml` in the
///   current directory when `None`
///
/// # Returns
/// * `Ok(Config)` - Loaded configuration
/// * `Err` - If the file is missing, cannot be read, or is invalid
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if !path.exists() {
        return Err(BumpvError::config(format!(
            "no file found at: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)?;
    Config::from_toml(&contents, path)
}

/// Write `new_version` into `bumpv.current_version`, keeping the rest of the
/// file (comments, ordering, formatting) as it was.
pub fn persist_current_version(path: &Path, new_version: &str) -> Result<()> {
    let contents = fs::read_to_string(path)?;
    let mut doc = contents.parse::<DocumentMut>()?;

    let table = doc
        .get_mut("bumpv")
        .and_then(|item| item.as_table_like_mut())
        .ok_or_else(|| {
            BumpvError::config(format!("no [bumpv] table in {}", path.display()))
        })?;

    match table
        .get_mut("current_version")
        .and_then(|item| item.as_value_mut())
    {
        Some(value) => {
            let decor = value.decor().clone();
            *value = toml_edit::Value::from(new_version);
            *value.decor_mut() = decor;
        }
        None => {
            table.insert("current_version", toml_edit::value(new_version));
        }
    }

    write_atomic(path, &doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[bumpv]
current_version = "1.2.3"
"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml(MINIMAL, ".bumpv.toml").unwrap();
        assert!(!config.bumpv.commit);
        assert!(!config.bumpv.tag);
        assert_eq!(config.bumpv.parse, DEFAULT_PARSE);
        assert_eq!(config.bumpv.serialize.0, vec![DEFAULT_SERIALIZE]);
        assert_eq!(config.bumpv.search, "{current_version}");
        assert_eq!(config.bumpv.replace, "{new_version}");
        assert_eq!(config.bumpv.tag_name, "v{new_version}");
        assert_eq!(
            config.bumpv.message,
            "Bump version: {current_version} → {new_version}"
        );
        assert!(config.bumpv.files.is_empty());
    }

    #[test]
    fn test_missing_current_version() {
        let err = Config::from_toml("[bumpv]\ncommit = true\n", ".bumpv.toml").unwrap_err();
        assert!(err.to_string().contains("current_version"));
    }

    #[test]
    fn test_serialize_as_multiline_string() {
        let toml = r#"
[bumpv]
current_version = "1.2.3"
serialize = """
{major}.{minor}.{patch}-{label}
{major}.{minor}.{patch}
"""
"#;
        let config = Config::from_toml(toml, ".bumpv.toml").unwrap();
        assert_eq!(
            config.bumpv.serialize.0,
            vec!["{major}.{minor}.{patch}-{label}", "{major}.{minor}.{patch}"]
        );
    }

    #[test]
    fn test_files_resolve_against_config_dir() {
        let toml = r#"
[bumpv]
current_version = "1.2.3"

[[bumpv.file]]
path = "src/version.txt"

[[bumpv.file]]
path = "setup.py"
search = "version='{current_version}'"
replace = "version='{new_version}'"
"#;
        let config = Config::from_toml(toml, "project/.bumpv.toml").unwrap();
        let targets = config.file_targets().unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].path, Path::new("project/src/version.txt"));
        assert_eq!(targets[0].search, "{current_version}");
        assert_eq!(targets[1].path, Path::new("project/setup.py"));
        assert_eq!(targets[1].replace, "version='{new_version}'");
        assert!(targets[0].pattern.is_none());
    }

    #[test]
    fn test_file_pattern_override() {
        let toml = r#"
[bumpv]
current_version = "1.2.3"

[[bumpv.file]]
path = "docs/conf.py"
serialize = "{major}.{minor}"
"#;
        let config = Config::from_toml(toml, ".bumpv.toml").unwrap();
        let targets = config.file_targets().unwrap();
        let pattern = targets[0].pattern.as_ref().unwrap();
        assert_eq!(pattern.as_str(), DEFAULT_PARSE);
        assert_eq!(pattern.serialize_templates()[0].as_str(), "{major}.{minor}");
    }

    #[test]
    fn test_parts() {
        let toml = r#"
[bumpv]
current_version = "1.2.3-beta"
parse = '(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)(-(?P<label>[a-z]+))?'
serialize = ["{major}.{minor}.{patch}-{label}", "{major}.{minor}.{patch}"]

[bumpv.part.label]
values = ["alpha", "beta", "final"]
optional_value = "final"

[bumpv.part.build]
first_value = "1"
"#;
        let config = Config::from_toml(toml, ".bumpv.toml").unwrap();
        let version = config.current_version().unwrap();
        assert_eq!(version.bump("patch").unwrap().serialize().unwrap(), "1.2.4");

        let pattern = config.version_pattern().unwrap();
        assert_eq!(config.unused_parts(&pattern), vec!["build".to_string()]);
    }

    #[test]
    fn test_invalid_current_version() {
        let toml = r#"
[bumpv]
current_version = "one.two"
"#;
        let config = Config::from_toml(toml, ".bumpv.toml").unwrap();
        assert!(matches!(
            config.orchestrator(),
            Err(BumpvError::Parse { .. })
        ));
    }

    #[test]
    fn test_unsatisfiable_serialize_fails_before_run() {
        let toml = r#"
[bumpv]
current_version = "1.2.3"
serialize = "{major}.{minor}.{build}"
"#;
        let config = Config::from_toml(toml, ".bumpv.toml").unwrap();
        assert!(matches!(
            config.orchestrator(),
            Err(BumpvError::Serialize { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[bumpv\ncurrent_version = 1", ".bumpv.toml").unwrap_err();
        assert!(matches!(err, BumpvError::Toml(_)));
    }
}
