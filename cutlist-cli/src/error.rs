// ============================================================================
// cutlist-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type so that every command returns the same
// CliResult, and main can report any failure the same way. Core errors talk
// about 0-based row indices; everything printed here names the shot-list file
// or the 1-based row the user typed.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: names the store or row a failed step was working on
//
// AI-ASSISTANT-INFO: CLI error handling utilities

// ---- Internal crate imports ----
use cutlist_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::path::Path;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Extension trait that says which shot list or row a failed step touched.
///
/// The result stays a [`CoreError`] (always [`CoreError::OperationFailed`]).
pub trait CliErrorContext<T> {
    /// Prefixes the error with `"<action> <store>"`, e.g. `Cannot save promo.csv`.
    fn store_context(self, action: &str, store: &Path) -> CliResult<T>;

    /// Rewrites the error in terms of the 1-based `row` given on the command line.
    fn row_context(self, row: u64) -> CliResult<T>;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn store_context(self, action: &str, store: &Path) -> CliResult<T> {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{} {}: {}", action, store.display(), core_error))
        })
    }

    fn row_context(self, row: u64) -> CliResult<T> {
        self.map_err(|e| {
            let message = match e.into() {
                CoreError::GapRejected { reason, .. } => {
                    format!("Row {row} cannot become a gap: {reason}")
                }
                CoreError::RowOutOfRange(_) => format!("Row {row} does not exist"),
                other => format!("Row {row}: {other}"),
            };
            CoreError::OperationFailed(message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_context_names_the_file() {
        let io: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"));
        let err = io.store_context("Cannot save", Path::new("promo.csv")).unwrap_err();
        assert!(matches!(&err, CoreError::OperationFailed(msg)
            if msg.starts_with("Cannot save promo.csv: ") && msg.contains("read-only")));
    }

    #[test]
    fn test_row_context_uses_command_line_numbering() {
        let rejected: Result<(), CoreError> = Err(CoreError::GapRejected {
            index: 2,
            reason: "duration is not positive".to_string(),
        });
        let err = rejected.row_context(3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Operation failed: Row 3 cannot become a gap: duration is not positive"
        );

        let missing: Result<(), CoreError> = Err(CoreError::RowOutOfRange(8));
        assert!(missing.row_context(9).unwrap_err().to_string().contains("Row 9 does not exist"));

        let copy: Result<(), CoreError> = Err(CoreError::PathError("does not match".to_string()));
        let err = copy.row_context(1).unwrap_err();
        assert!(err.to_string().contains("Row 1: Path error: does not match"));
    }
}
