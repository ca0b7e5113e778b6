//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use crate::cli::ProjectArgs;
use crate::error::CliResult;

use cutlist_core::events::json_handler::JsonProgressHandler;
use cutlist_core::file_logging::FileLoggingHandler;
use cutlist_core::{CoreConfigBuilder, CoreError, EventHandler, FfprobeInspector, Session};

use std::sync::Arc;

/// `scan`: validate every row, preview, optionally gap the errors, save.
pub mod scan;

/// `fix`: correct a single stored row and save.
pub mod fix;

/// `generate`: re-validate and write the timeline document.
pub mod generate;

/// Builder preloaded with the project paths, after checking they exist.
pub(crate) fn project_config(project: &ProjectArgs) -> CliResult<CoreConfigBuilder> {
    if !project.shot_list.is_file() {
        return Err(CoreError::PathError(format!(
            "Shot list '{}' does not exist",
            project.shot_list.display()
        )));
    }
    if !project.video_dir.is_dir() {
        return Err(CoreError::PathError(format!(
            "Video folder '{}' is not a directory",
            project.video_dir.display()
        )));
    }
    Ok(CoreConfigBuilder::new()
        .shot_list(project.shot_list.clone())
        .video_dir(project.video_dir.clone()))
}

/// Creates a session probing media with ffprobe (or the program given by `--ffprobe`).
pub(crate) fn open_session(
    project: &ProjectArgs,
    builder: CoreConfigBuilder,
) -> CliResult<Session> {
    let config = builder.build();
    config.validate()?;
    let inspector = match &project.ffprobe {
        Some(program) => FfprobeInspector::with_program(program.clone()),
        None => FfprobeInspector::new(),
    };
    Ok(Session::new(config, Arc::new(inspector)))
}

/// Event handlers attached to worker jobs: JSON lines on stdout, and the
/// file log when one is open.
pub(crate) fn job_handlers(json: bool, file_logging: bool) -> Vec<Arc<dyn EventHandler>> {
    let mut handlers: Vec<Arc<dyn EventHandler>> = Vec::new();
    if json {
        handlers.push(Arc::new(JsonProgressHandler::new()));
    }
    if file_logging {
        handlers.push(Arc::new(FileLoggingHandler::new()));
    }
    handlers
}
