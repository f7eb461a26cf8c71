//! Main workflow orchestration logic
//!
//! Connects the configuration file, the bump core, version control and
//! configuration write-back. Kept apart from `main.rs` so it can be driven
//! programmatically and tested with a mock VCS.

use std::path::PathBuf;

use log::{debug, info};

use crate::boundary::BumpWarning;
use crate::bump::BumpResult;
use crate::config::{self, Config};
use crate::error::{BumpvError, Result};
use crate::vcs::{Git2Vcs, Vcs};

/// Arguments for the bump workflow
///
/// Mirrors the CLI Args in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    /// Path to the configuration file
    pub config_path: Option<PathBuf>,

    /// Version part to bump
    pub part: String,

    /// Preview mode - no files, config, commits or tags are written
    pub dry_run: bool,

    /// Proceed even if tracked files have uncommitted changes
    pub allow_dirty: bool,
}

/// Result of a successful bump workflow
#[derive(Debug, Clone)]
pub struct WorkflowResult {
    pub bump: BumpResult,

    pub warnings: Vec<BumpWarning>,

    /// Configuration file the run used
    pub config_path: PathBuf,

    /// Whether the new version was written back to the configuration
    pub config_written: bool,

    pub committed: bool,

    pub tagged: bool,
}

/// Load the configuration and run the bump against the enclosing git
/// repository.
///
/// The repository is only opened when a commit or tag is requested and the
/// run is not a dry run.
pub fn run_bump_workflow(args: &BumpWorkflowArgs) -> Result<WorkflowResult> {
    let config = config::load_config(args.config_path.as_deref())?;
    debug!("loaded configuration from {}", config.path.display());

    if needs_vcs(&config, args.dry_run) {
        let vcs = Git2Vcs::open(config.base_dir())?;
        run_with_vcs(args, &config, Some(&vcs))
    } else {
        run_with_vcs(args, &config, None)
    }
}

/// Run the workflow with an already loaded configuration.
///
/// 1. Build the orchestrator (all patterns and templates validated)
/// 2. Check the working directory when a commit or tag is requested
/// 3. Bump and rewrite files
/// 4. Write the new version back to the configuration file
/// 5. Stage and commit, then tag
///
/// # Arguments
///
/// * `args` - Workflow arguments (part, dry_run, allow_dirty)
/// * `config` - Loaded configuration
/// * `vcs` - Version control to use; required when a commit or tag is
///   requested outside a dry run
pub fn run_with_vcs(
    args: &BumpWorkflowArgs,
    config: &Config,
    vcs: Option<&dyn Vcs>,
) -> Result<WorkflowResult> {
    let orchestrator = config.orchestrator()?;
    let mut warnings = collect_config_warnings(config)?;

    let vcs = if needs_vcs(config, args.dry_run) {
        let vcs = vcs.ok_or_else(|| {
            BumpvError::config("commit or tag requested but no version control is available")
        })?;
        let dirty = vcs.dirty_files()?;
        if !dirty.is_empty() {
            if !args.allow_dirty {
                return Err(BumpvError::DirtyWorkingDirectory { files: dirty });
            }
            warnings.push(BumpWarning::DirtyWorkingDirectory { files: dirty });
        }
        if config.bumpv.tag {
            let tag = orchestrator.next_tag(&args.part)?;
            if vcs.tag_exists(&tag)? {
                return Err(BumpvError::TagExists { tag });
            }
        }
        Some(vcs)
    } else {
        None
    };

    info!(
        "bumping '{}' from {}",
        args.part, config.bumpv.current_version
    );
    let bump = orchestrator.run(&args.part, args.dry_run)?;
    info!("new version {}", bump.new_version);

    let mut result = WorkflowResult {
        bump,
        warnings,
        config_path: config.path.clone(),
        config_written: false,
        committed: false,
        tagged: false,
    };

    if args.dry_run {
        return Ok(result);
    }

    // Files are already rewritten; any later failure has to say so.
    if let Err(source) = finish_run(&mut result, config, vcs) {
        return Err(BumpvError::IncompleteRun {
            new_version: result.bump.new_version.clone(),
            written: result.bump.changed_paths(),
            config_written: result.config_written,
            committed: result.committed,
            source: Box::new(source),
        });
    }

    Ok(result)
}

/// Write the config back, then commit and tag, recording progress in
/// `result` as each step succeeds.
fn finish_run(result: &mut WorkflowResult, config: &Config, vcs: Option<&dyn Vcs>) -> Result<()> {
    config::persist_current_version(&config.path, &result.bump.new_version)?;
    result.config_written = true;
    debug!("wrote current_version to {}", config.path.display());

    let vcs = match vcs {
        Some(vcs) => vcs,
        None => return Ok(()),
    };

    if let Some(commit) = &result.bump.commit {
        for path in commit.paths.iter().chain(std::iter::once(&config.path)) {
            debug!("staging {}", path.display());
            vcs.add_path(path)?;
        }
        debug!("committing with message: {}", commit.message);
        vcs.commit(&commit.message)?;
        result.committed = true;
    }
    if result.bump.create_tag {
        debug!("creating tag {}", result.bump.tag);
        vcs.tag(&result.bump.tag)?;
        result.tagged = true;
    }

    Ok(())
}

fn needs_vcs(config: &Config, dry_run: bool) -> bool {
    !dry_run && (config.bumpv.commit || config.bumpv.tag)
}

fn collect_config_warnings(config: &Config) -> Result<Vec<BumpWarning>> {
    let mut warnings = Vec::new();

    if config.bumpv.files.is_empty() {
        warnings.push(BumpWarning::NoFilesConfigured {
            config: config.path.display().to_string(),
        });
    }

    let pattern = config.version_pattern()?;
    for part in config.unused_parts(&pattern) {
        warnings.push(BumpWarning::UnusedPartConfig { part });
    }

    Ok(warnings)
}
