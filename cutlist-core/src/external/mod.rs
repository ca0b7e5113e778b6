// ============================================================================
// cutlist-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the Media Inspection Tool
//
// This module encapsulates interactions with ffprobe. It exposes the
// `MediaInspector` trait so that the validator never talks to a process
// directly, and provides the concrete `FfprobeInspector` plus a mock used by
// tests.
//
// KEY COMPONENTS:
// - MediaInspector trait and its ffprobe-backed implementation
// - ProbeReport: the JSON report the inspector returns
// - Dependency checking function
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions for ffprobe

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains the inspector trait, report types and the ffprobe implementation
pub mod ffprobe_executor;

/// Canned inspector for tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffprobe_executor::{FfprobeInspector, MediaInspector, ProbeFormat, ProbeReport, ProbeStream};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// This function attempts to run the specified command with a `-version`
/// argument to verify that it exists and is executable.
///
/// # Arguments
///
/// * `cmd_name` - The name of the command to check (e.g., "ffprobe")
///
/// # Returns
///
/// * `Ok(())` - If the command could be started
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_is_reported() {
        let result = check_dependency("cutlist-no-such-tool-7f3a");
        assert!(matches!(
            result,
            Err(CoreError::DependencyNotFound(name)) if name == "cutlist-no-such-tool-7f3a"
        ));
    }
}
