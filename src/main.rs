//! nbkit - batch runner and metadata editor for notebook curricula.
//!
//! Three independent subcommands share one notebook model:
//! `run` executes notebooks in place, `strip-opening` removes the bold line
//! under each title, and `describe` fills in SEO description metadata.

mod cli;
mod config;
mod constants;
mod core;
mod logging;
mod notebook;

use clap::Parser;
use cli::args::Args;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();

    let root = args
        .root
        .canonicalize()
        .wrap_err_with(|| format!("Root directory not found: {}", args.root.display()))?;
    if !root.is_dir() {
        return Err(eyre!("Root is not a directory: {}", root.display()));
    }

    let (config, source) = config::load(&root, args.config.as_deref())?;

    let level = args
        .log_level
        .as_deref()
        .or(config.log_level.as_deref())
        .unwrap_or(constants::DEFAULT_LOG_LEVEL);
    logging::init(level).map_err(|e| eyre!(e))?;
    log::debug!(
        "event=config_loaded module=main status=ok source={source} root={}",
        root.display()
    );

    cli::commands::dispatch(&args.command, &root, &config)
}
