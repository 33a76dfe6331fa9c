//! CLI command handlers.
//!
//! Each handler prints its progress and summary to stdout and returns the
//! process exit code. Per-notebook failures are logged and counted; only
//! setup errors (bad config, unusable root) are returned as `Err`.

use crate::cli::args::Commands;
use crate::config::Config;
use crate::constants;
use crate::core::{describe, runner, strip};
use color_eyre::eyre::{eyre, Result};
use std::path::Path;
use std::process::ExitCode;

/// Dispatches a parsed subcommand.
///
/// # Errors
///
/// Returns an error if the command cannot start at all.
pub fn dispatch(command: &Commands, root: &Path, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Run { directory } => handle_run(root, directory.as_deref(), config),
        Commands::StripOpening { directory } => {
            Ok(handle_strip_opening(root, directory.as_deref(), config))
        }
        Commands::Describe { dry_run } => Ok(handle_describe(root, *dry_run, config)),
    }
}

/// `nbkit run [DIRECTORY]`
///
/// Always exits 0 once the batch starts; the executor's status is only logged.
fn handle_run(root: &Path, directory: Option<&str>, config: &Config) -> Result<ExitCode> {
    let command = runner::RunCommand::from_template(&config.run.command).map_err(|e| eyre!(e))?;
    let targets = runner::select(root, directory);
    if targets.is_empty() {
        println!("{}", constants::CLI_MSG_NO_NOTEBOOKS);
        return Ok(ExitCode::SUCCESS);
    }

    let summary = runner::run_all(root, &targets, &command);
    log::info!(
        "event=run_summary module=cli selected={} succeeded={} nonzero_exit={} failed_to_launch={}",
        summary.selected,
        summary.succeeded,
        summary.nonzero_exit,
        summary.failed_to_launch
    );
    Ok(ExitCode::SUCCESS)
}

/// `nbkit strip-opening [DIRECTORY]`
///
/// Exits 1 if any notebook was missing or left untouched.
fn handle_strip_opening(root: &Path, directory: Option<&str>, config: &Config) -> ExitCode {
    let targets = strip::batch_targets(
        root,
        &config.strip.notebooks,
        &config.exclude_dirs,
        directory,
    );
    let summary = strip::strip_all(root, &targets);

    println!();
    println!("Modified: {}/{}", summary.modified, summary.total);
    println!("Errors: {}/{}", summary.errors, summary.total);

    if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// `nbkit describe [--dry-run]`
///
/// Exits 1 if any notebook could not be read or written.
fn handle_describe(root: &Path, dry_run: bool, config: &Config) -> ExitCode {
    let targets = describe::batch_targets(root, &config.exclude_dirs);
    println!("Found {} notebooks", targets.len());
    println!();

    let summary = describe::describe_all(&targets, &config.describe, dry_run);

    println!();
    let suffix = if dry_run { constants::CLI_MSG_DRY_RUN } else { "" };
    println!("Updated {} notebooks{suffix}", summary.updated);
    log::info!(
        "event=describe_summary module=cli found={} updated={} skipped={} undescribed={} errors={}",
        summary.found,
        summary.updated,
        summary.skipped,
        summary.undescribed,
        summary.errors
    );

    if summary.errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
