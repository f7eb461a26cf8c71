use std::fmt;

/// Non-fatal conditions noticed while preparing or running a bump.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BumpWarning {
    /// The configuration lists no files to update
    NoFilesConfigured { config: String },
    /// Modified tracked files exist and `--allow-dirty` was given
    DirtyWorkingDirectory { files: Vec<String> },
    /// A `[bumpv.part.<name>]` table names no component of the parse pattern
    UnusedPartConfig { part: String },
}

impl fmt::Display for BumpWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpWarning::NoFilesConfigured { config } => {
                write!(f, "No files configured in '{}'; only the version will change", config)
            }
            BumpWarning::DirtyWorkingDirectory { files } => {
                let shown: Vec<&str> = files.iter().take(5).map(String::as_str).collect();
                write!(f, "Working directory is dirty: {}", shown.join(", "))?;
                if files.len() > 5 {
                    write!(f, " and {} more", files.len() - 5)?;
                }
                Ok(())
            }
            BumpWarning::UnusedPartConfig { part } => {
                write!(
                    f,
                    "Part '{}' is configured but not captured by the parse pattern",
                    part
                )
            }
        }
    }
}
