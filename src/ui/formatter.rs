//! Pure formatting functions for UI output.
//!
//! Everything user-facing that is not the machine-readable result goes
//! through here. Status lines go to stdout, warnings and errors to stderr.

use console::style;

use crate::boundary::BumpWarning;
use crate::files::FileChange;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &BumpWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change.
pub fn display_version_change(old_version: &str, new_version: &str) {
    println!("\n{}", style("Version:").bold());
    println!("  From: {}", style(old_version).red());
    println!("  To:   {}", style(new_version).green());
}

/// Display what changed in one file.
///
/// # Arguments
/// * `change` - The computed file change
/// * `dry_run` - Word the header as "would change" rather than "changed"
pub fn display_file_change(change: &FileChange, dry_run: bool) {
    for line in file_change_lines(change, dry_run) {
        println!("{}", line);
    }
}

/// Lines printed for one file: a header, then up to 5 changed lines as
/// `-`/`+` pairs.
fn file_change_lines(change: &FileChange, dry_run: bool) -> Vec<String> {
    let verb = if dry_run { "Would change" } else { "Changed" };
    let mut out = vec![format!(
        "\n{} {} ({} replacement{})",
        style(verb).bold(),
        style(change.path.display()).cyan(),
        change.replacements,
        if change.replacements == 1 { "" } else { "s" }
    )];

    let lines = change.changed_lines();
    for (old, new) in lines.iter().take(MAX_SHOWN_LINES) {
        out.push(format!("  {} {}", style("-").red(), style(old).red()));
        out.push(format!("  {} {}", style("+").green(), style(new).green()));
    }
    if lines.len() > MAX_SHOWN_LINES {
        out.push(format!(
            "  ... and {} more changed lines",
            lines.len() - MAX_SHOWN_LINES
        ));
    }
    out
}

const MAX_SHOWN_LINES: usize = 5;

/// Display the steps a real run would perform after updating files.
pub fn display_dry_run_plan(config_path: &str, commit_message: Option<&str>, tag: Option<&str>) {
    display_status("Dry run, nothing was written:");
    display_success(&format!("  Would set current_version in {}", config_path));
    if let Some(message) = commit_message {
        display_success(&format!("  Would commit: {}", message));
    }
    if let Some(tag) = tag {
        display_success(&format!("  Would create tag: {}", tag));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_warning() {
        display_warning(&BumpWarning::UnusedPartConfig {
            part: "build".to_string(),
        });
    }

    fn change(original: &str, updated: &str, replacements: usize) -> FileChange {
        FileChange {
            path: PathBuf::from("VERSION"),
            search: "1.2.3".to_string(),
            replace: "1.3.0".to_string(),
            original: original.to_string(),
            updated: updated.to_string(),
            replacements,
        }
    }

    fn plain(lines: Vec<String>) -> Vec<String> {
        lines
            .iter()
            .map(|l| console::strip_ansi_codes(l).into_owned())
            .collect()
    }

    #[test]
    fn test_file_change_lines() {
        let single = change("1.2.3\n", "1.3.0\n", 1);

        assert_eq!(
            plain(file_change_lines(&single, true)),
            vec![
                "\nWould change VERSION (1 replacement)",
                "  - 1.2.3",
                "  + 1.3.0",
            ]
        );
        assert_eq!(
            plain(file_change_lines(&single, false))[0],
            "\nChanged VERSION (1 replacement)"
        );
    }

    #[test]
    fn test_file_change_lines_skip_unchanged_lines() {
        let change = change(
            "name = demo\nversion = 1.2.3\nrequires = 1.2.3\n",
            "name = demo\nversion = 1.3.0\nrequires = 1.3.0\n",
            2,
        );

        assert_eq!(
            plain(file_change_lines(&change, false)),
            vec![
                "\nChanged VERSION (2 replacements)",
                "  - version = 1.2.3",
                "  + version = 1.3.0",
                "  - requires = 1.2.3",
                "  + requires = 1.3.0",
            ]
        );
    }

    #[test]
    fn test_file_change_lines_truncate() {
        let original = "1.2.3\n".repeat(7);
        let updated = "1.3.0\n".repeat(7);
        let lines = plain(file_change_lines(&change(&original, &updated, 7), false));

        assert_eq!(lines.len(), 1 + 5 * 2 + 1);
        assert_eq!(lines[0], "\nChanged VERSION (7 replacements)");
        assert_eq!(lines[11], "  ... and 2 more changed lines");
    }

    #[test]
    fn test_file_change_lines_when_line_count_changes() {
        let change = change("1.2.3", "1.3.0\nnext", 1);

        assert_eq!(
            plain(file_change_lines(&change, false))[1..],
            ["  - 1.2.3", "  + 1.3.0\nnext"]
        );
    }

    #[test]
    fn test_display_file_change() {
        display_file_change(&change("1.2.3\n", "1.3.0\n", 1), true);
    }

    #[test]
    fn test_display_dry_run_plan() {
        display_dry_run_plan(".bumpv.toml", Some("Bump version: 1.2.3 → 1.3.0"), None);
    }
}
