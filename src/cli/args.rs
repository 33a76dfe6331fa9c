//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nbkit - batch runner and metadata editor for notebook curricula
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Repository root that notebook paths are resolved against
    #[arg(long, global = true, env = "NBKIT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (default: <root>/nbkit.toml, then the user config)
    #[arg(long, global = true, env = "NBKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error, off)
    #[arg(long, global = true, env = "NBKIT_LOG")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute notebooks in place, in sorted order
    Run {
        /// Only run notebooks directly inside this directory (e.g. 'building-a-transformer')
        directory: Option<String>,
    },
    /// Remove the bold opening line that follows each notebook's title
    StripOpening {
        /// Only process notebooks below this top-level directory
        directory: Option<String>,
    },
    /// Add SEO description metadata extracted from each notebook's markdown
    Describe {
        /// Report what would be written without saving
        #[arg(long)]
        dry_run: bool,
    },
}
