//! Configuration loading.
//!
//! Settings come from a TOML file. The first file found wins: an explicit
//! `--config` path, `<root>/nbkit.toml`, then `<config_dir>/nbkit/config.toml`.
//! Every key is optional and falls back to the built-in defaults.

use crate::constants;
use color_eyre::eyre::{bail, Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log level used when `--log-level` is not given.
    pub log_level: Option<String>,
    /// Directory names never descended into when searching for notebooks.
    pub exclude_dirs: Vec<String>,
    /// Batch execution settings.
    pub run: RunConfig,
    /// Opening-line removal settings.
    pub strip: StripConfig,
    /// Description extraction settings.
    pub describe: DescribeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            exclude_dirs: vec![constants::CHECKPOINTS_DIR_NAME.to_string()],
            run: RunConfig::default(),
            strip: StripConfig::default(),
            describe: DescribeConfig::default(),
        }
    }
}

impl Config {
    /// Rejects values no command can work with.
    ///
    /// # Errors
    ///
    /// Returns an error if `describe.max_chars` cannot hold the ellipsis.
    pub fn validate(&self) -> Result<()> {
        let min = constants::ELLIPSIS.len();
        if self.describe.max_chars < min {
            bail!(
                "describe.max_chars must be at least {min}, got {}",
                self.describe.max_chars
            );
        }
        Ok(())
    }
}

/// Settings for `nbkit run`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Program and arguments; `{notebook}` is replaced with the notebook path.
    pub command: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            command: constants::DEFAULT_RUN_COMMAND
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Settings for `nbkit strip-opening`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StripConfig {
    /// Notebooks to process, relative to the root. Empty means all notebooks.
    pub notebooks: Vec<String>,
}

/// Settings for `nbkit describe`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DescribeConfig {
    /// Thumbnail written next to a new description.
    pub thumbnail: String,
    /// Longest description, in characters.
    pub max_chars: usize,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            thumbnail: constants::DEFAULT_THUMBNAIL.to_string(),
            max_chars: constants::DEFAULT_DESCRIPTION_MAX_CHARS,
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file.
    File(PathBuf),
    /// No file found; built-in defaults.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// User-level configuration file path, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| {
        d.join(constants::APP_NAME)
            .join(constants::USER_CONFIG_FILE_NAME)
    })
}

/// Parses a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML for
/// [`Config`], or fails [`Config::validate`].
pub fn load_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Resolves and loads the configuration for `root`.
///
/// An explicit path must exist. The implicit locations are optional.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<(Config, ConfigSource)> {
    if let Some(path) = explicit {
        return Ok((load_file(path)?, ConfigSource::File(path.to_path_buf())));
    }

    let candidates = std::iter::once(root.join(constants::PROJECT_CONFIG_FILE_NAME))
        .chain(user_config_path());
    for path in candidates {
        if path.is_file() {
            let config = load_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }
    }

    Ok((Config::default(), ConfigSource::Defaults))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.run.command[0], "jupyter");
        assert!(config
            .run
            .command
            .iter()
            .any(|a| a == constants::NOTEBOOK_PLACEHOLDER));
        assert_eq!(config.describe.max_chars, 160);
        assert_eq!(config.describe.thumbnail, "intro.png");
        assert!(config.strip.notebooks.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
log_level = "info"

[describe]
thumbnail = "cover.png"
"#,
        )
        .unwrap();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.describe.thumbnail, "cover.png");
        assert_eq!(config.describe.max_chars, 160);
        assert_eq!(config.run, RunConfig::default());
    }

    #[test]
    fn test_exclude_dirs_is_top_level() {
        let config: Config = toml::from_str("exclude_dirs = [\"_build\"]\n").unwrap();
        assert_eq!(config.exclude_dirs, vec!["_build"]);
        assert!(toml::from_str::<Config>("[describe]\nexclude_dirs = []\n").is_err());
        assert_eq!(
            Config::default().exclude_dirs,
            vec![constants::CHECKPOINTS_DIR_NAME]
        );
    }

    #[test]
    fn test_max_chars_below_ellipsis_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.toml");
        std::fs::write(&path, "[describe]\nmax_chars = 2\n").unwrap();
        assert!(load_file(&path).is_err());

        std::fs::write(&path, "[describe]\nmax_chars = 3\n").unwrap();
        assert_eq!(load_file(&path).unwrap().describe.max_chars, 3);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("colour = \"red\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_project_file_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::PROJECT_CONFIG_FILE_NAME);
        std::fs::write(&path, "[strip]\nnotebooks = [\"a/01.ipynb\"]\n").unwrap();

        let (config, source) = load(dir.path(), None).unwrap();
        assert_eq!(config.strip.notebooks, vec!["a/01.ipynb"]);
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(load(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_explicit_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(constants::PROJECT_CONFIG_FILE_NAME),
            "log_level = \"debug\"\n",
        )
        .unwrap();
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "log_level = \"error\"\n").unwrap();

        let (config, source) = load(dir.path(), Some(&explicit)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("error"));
        assert_eq!(source, ConfigSource::File(explicit));
    }
}
