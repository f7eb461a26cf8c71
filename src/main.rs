use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use log::LevelFilter;

use bumpv::cli::{run_bump_workflow, BumpWorkflowArgs, WorkflowResult};
use bumpv::ui::{self, OutputFormat};

#[derive(clap::Parser)]
#[command(
    name = "bumpv",
    version,
    about = "Bump version strings in project files, then optionally commit and tag"
)]
struct Args {
    #[arg(help = "Version part to bump, e.g. major, minor or patch")]
    part: String,

    #[arg(short, long, help = "Configuration file path [default: .bumpv.toml]")]
    config: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Proceed even if the working directory is dirty")]
    allow_dirty: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    verbose: u8,

    #[arg(long, help = "Print the result as key=value lines")]
    list: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, help = "Result format")]
    output: OutputFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let workflow_args = BumpWorkflowArgs {
        config_path: args.config.clone(),
        part: args.part.clone(),
        dry_run: args.dry_run,
        allow_dirty: args.allow_dirty,
    };

    let result = match run_bump_workflow(&workflow_args) {
        Ok(result) => result,
        Err(e) => {
            ui::display_error(&e.to_string());
            if e.is_configuration_error() {
                ui::display_status("Check the [bumpv] settings in your configuration file");
            }
            std::process::exit(1);
        }
    };

    for warning in &result.warnings {
        ui::display_warning(warning);
    }

    if args.list {
        println!("{}", ui::render_list(&result.bump));
        return Ok(());
    }

    if args.output == OutputFormat::Text {
        display_summary(&result);
    }
    println!("{}", ui::render_result(&result.bump, args.output)?);

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn display_summary(result: &WorkflowResult) {
    let bump = &result.bump;
    ui::display_version_change(&bump.old_version, &bump.new_version);

    for change in &bump.changes {
        ui::display_file_change(change, bump.dry_run);
    }
    println!();

    if bump.dry_run {
        let tag = bump.create_tag.then_some(bump.tag.as_str());
        ui::display_dry_run_plan(
            &result.config_path.display().to_string(),
            bump.commit.as_ref().map(|c| c.message.as_str()),
            tag,
        );
        return;
    }

    if result.config_written {
        ui::display_success(&format!(
            "Updated current_version in {}",
            result.config_path.display()
        ));
    }
    if result.committed {
        ui::display_success("Committed changes");
    }
    if result.tagged {
        ui::display_success(&format!("Created tag: {}", bump.tag));
    }
}
