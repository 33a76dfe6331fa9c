//! Logging bootstrap.
//!
//! Diagnostics go to stderr through `flexi_logger` so that the progress lines
//! and summaries on stdout stay machine-readable. Initialization happens once
//! per process and never panics.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<(&'static str, LoggerHandle)> = OnceCell::new();

/// Normalizes a user-supplied level name.
///
/// # Errors
///
/// Returns an error for anything but trace, debug, info, warn(ing), error, or off.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

/// Starts the stderr logger at `level`.
///
/// Repeated calls with the same level are no-ops.
///
/// # Errors
///
/// Returns an error when the level is unknown, when the logger was already
/// started at a different level, or when the backend fails to start.
pub fn init(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    if let Some((active, _)) = LOGGER.get() {
        if *active == level {
            return Ok(());
        }
        return Err(format!(
            "logging already initialized with level `{active}`; refusing to switch to `{level}`"
        ));
    }

    LOGGER.get_or_try_init(|| -> Result<_, String> {
        let handle = Logger::try_with_str(level)
            .map_err(|err| format!("invalid log level `{level}`: {err}"))?
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;
        Ok((level, handle))
    })?;

    log::debug!(
        "event=app_start module=logging status=ok version={} level={level}",
        crate::constants::APP_VERSION
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert_eq!(normalize_level("off").unwrap(), "off");
    }

    #[test]
    fn test_normalize_level_rejects_unknown() {
        let err = normalize_level("loud").unwrap_err();
        assert!(err.contains("unsupported log level"));
    }

    #[test]
    fn test_init_is_idempotent_and_rejects_conflicts() {
        init("error").unwrap();
        init("error").unwrap();
        let err = init("trace").unwrap_err();
        assert!(err.contains("refusing to switch"));
    }
}
