//! Application-wide constants and configuration values.
//!
//! This module defines the static defaults used throughout nbkit, including
//! file names, the notebook execution command, description limits, and the
//! messages printed by the CLI.

// === Application Metadata ===

/// Application name (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// === Path Configuration ===

/// Notebook file extension (without the dot).
pub const NOTEBOOK_EXT: &str = "ipynb";
/// Directory name Jupyter uses for autosave checkpoints.
pub const CHECKPOINTS_DIR_NAME: &str = ".ipynb_checkpoints";
/// Project-local configuration file, looked up under the root directory.
pub const PROJECT_CONFIG_FILE_NAME: &str = "nbkit.toml";
/// User-level configuration file, looked up under `<config_dir>/nbkit/`.
pub const USER_CONFIG_FILE_NAME: &str = "config.toml";

// === Notebook Execution ===

/// Placeholder substituted with the notebook path in the run command.
pub const NOTEBOOK_PLACEHOLDER: &str = "{notebook}";
/// Default command used to execute a notebook and save its outputs in place.
pub const DEFAULT_RUN_COMMAND: [&str; 7] = [
    "jupyter",
    "nbconvert",
    "--to",
    "notebook",
    "--execute",
    NOTEBOOK_PLACEHOLDER,
    "--inplace",
];

// === Description Extraction ===

/// Longest description written into notebook metadata, in characters.
pub const DEFAULT_DESCRIPTION_MAX_CHARS: usize = 160;
/// Suffix appended to a truncated description.
pub const ELLIPSIS: &str = "...";
/// Stop collecting markdown once this many characters have been gathered.
pub const DESCRIPTION_COLLECT_CHARS: usize = 100;
/// A first sentence shorter than this gets the second sentence appended.
pub const SHORT_SENTENCE_CHARS: usize = 100;
/// Default thumbnail written alongside a new description.
pub const DEFAULT_THUMBNAIL: &str = "intro.png";
/// Characters of the description echoed in the progress line.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 60;

// === Diagnostics ===

/// Characters of an offending line quoted in a strip diagnostic.
pub const DIAGNOSTIC_SNIPPET_CHARS: usize = 50;
/// Log level used when neither the CLI nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// === Messages: CLI Output ===

pub const CLI_MSG_RUNNING: &str = "Running ";
pub const CLI_MSG_PROCESSING: &str = "Processing ";
pub const CLI_MSG_OK: &str = "✓";
pub const CLI_MSG_FAIL: &str = "✗";
pub const CLI_MSG_WARN: &str = "⚠";
pub const CLI_MSG_NOT_FOUND: &str = "Notebook not found: ";
pub const CLI_MSG_NO_NOTEBOOKS: &str = "No notebooks matched";
pub const CLI_MSG_DRY_RUN: &str = " (dry run)";
