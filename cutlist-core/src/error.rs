// ============================================================================
// cutlist-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Cutlist Core Library
//
// This module defines the operation-level error type used throughout the
// library. Row-level problems (missing files, bad timecodes) are NOT errors
// here: they are recorded on the row as a `RowStatus` and never abort a batch.
// A `CoreError` always means the whole operation failed.
//
// AI-ASSISTANT-INFO: Error types for cutlist-core

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::process::ExitStatus;

/// Errors produced by timecode and range parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("Malformed timecode: '{0}'")]
    MalformedTimecode(String),

    #[error("Malformed range: '{0}'")]
    MalformedRange(String),
}

/// Custom error types for cutlist operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("Shot list error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML write error: {0}")]
    XmlWrite(String),

    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot convert row {index} to a gap: {reason}")]
    GapRejected { index: usize, reason: String },

    #[error("Row {0} does not exist")]
    RowOutOfRange(usize),

    #[error("Another operation is already running: {0}")]
    OperationBusy(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for cutlist operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds the error for an external command that could not be spawned.
pub fn command_start_error(command: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Builds the error for an external command that ran but exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
