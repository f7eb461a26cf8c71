//! User interface module - result rendering and formatting.
//!
//! - `formatter` - Coloured status, warning and diff output
//! - This module - Machine-readable rendering of a bump result

use clap::ValueEnum;

use crate::bump::BumpResult;
use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_dry_run_plan, display_error, display_file_change, display_status, display_success,
    display_version_change, display_warning,
};

/// How the final result is written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    Json,
    Yaml,
}

/// Render the public part of a bump result.
///
/// Text output is the new version alone, so it can be captured by scripts.
/// JSON and YAML contain `old_version`, `new_version` and `tag`.
pub fn render_result(result: &BumpResult, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Text => result.new_version.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Yaml => serde_yaml::to_string(result)?,
    };
    Ok(rendered.trim_end().to_string())
}

/// Render the result as `key=value` lines.
pub fn render_list(result: &BumpResult) -> String {
    let mut lines = vec![
        format!("current_version={}", result.old_version),
        format!("new_version={}", result.new_version),
        format!("tag={}", result.tag),
    ];
    for path in result.changed_paths() {
        lines.push(format!("file={}", path.display()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> BumpResult {
        BumpResult {
            old_version: "1.2.3".to_string(),
            new_version: "1.3.0".to_string(),
            tag: "v1.3.0".to_string(),
            changes: Vec::new(),
            commit: None,
            create_tag: false,
            dry_run: true,
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(render_result(&result(), OutputFormat::Text).unwrap(), "1.3.0");
    }

    #[test]
    fn test_render_json() {
        let rendered = render_result(&result(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["old_version"], "1.2.3");
        assert_eq!(value["new_version"], "1.3.0");
        assert_eq!(value["tag"], "v1.3.0");
    }

    #[test]
    fn test_render_yaml() {
        let rendered = render_result(&result(), OutputFormat::Yaml).unwrap();
        assert!(rendered.contains("old_version: 1.2.3"));
        assert!(rendered.contains("new_version: 1.3.0"));
        assert!(rendered.contains("tag: v1.3.0"));
    }

    #[test]
    fn test_render_list() {
        assert_eq!(
            render_list(&result()),
            "current_version=1.2.3\nnew_version=1.3.0\ntag=v1.3.0"
        );
    }
}
