// ============================================================================
// cutlist-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Console and file logger setup
//
// Console output goes through env_logger unless a log directory is given, in
// which case the core's log4rs setup writes to a timestamped file and mirrors
// to stderr.
//
// USAGE:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug or --verbose: Per-row validation details
//
// AI-ASSISTANT-INFO: Logging setup and helper functions

// ---- External crate imports ----
use cutlist_core::CoreError;
use cutlist_core::file_logging::setup::setup_file_logging;
use log::LevelFilter;

// ---- Internal crate imports ----
use crate::error::CliResult;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Returns
/// A string containing the formatted timestamp (e.g., "20240601_123045")
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Log file name for one run of `command`.
pub fn log_file_name(command: &str, timestamp: &str) -> String {
    format!("cutlist_{}_{}.log", command, timestamp)
}

/// Installs the global logger.
///
/// # Arguments
///
/// * `verbose` - Lower the level to debug
/// * `log_dir` - When set, log to `cutlist_<command>_<timestamp>.log` in this folder
/// * `command` - Subcommand name used in the log file name
///
/// # Returns
///
/// * `Ok(Some(path))` - The log file in use
/// * `Ok(None)` - Console logging only
pub fn init_logging(
    verbose: bool,
    log_dir: Option<&Path>,
    command: &str,
) -> CliResult<Option<PathBuf>> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    match log_dir {
        Some(dir) => {
            let log_path = dir.join(log_file_name(command, &get_timestamp()));
            setup_file_logging(&log_path, level).map_err(|e| {
                CoreError::OperationFailed(format!("Failed to set up file logging: {e}"))
            })?;
            Ok(Some(log_path))
        }
        None => {
            let default_filter = if verbose { "debug" } else { "info" };
            let env = env_logger::Env::default().default_filter_or(default_filter);
            env_logger::Builder::from_env(env)
                .format_timestamp(None)
                .format_target(false)
                .init();
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let timestamp = get_timestamp();
        assert_eq!(timestamp.len(), 15);
        assert_eq!(timestamp.as_bytes()[8], b'_');
        assert_eq!(
            log_file_name("scan", "20240601_123045"),
            "cutlist_scan_20240601_123045.log"
        );
    }
}
