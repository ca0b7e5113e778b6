//! Implementation of the 'generate' subcommand.
//!
//! Re-validates the shot list (stored gaps stay gaps without probing), then
//! compiles the timeline and writes the interchange document, all in one
//! worker job.

use crate::cli::GenerateArgs;
use crate::commands::{job_handlers, open_session, project_config};
use crate::error::CliResult;
use crate::output;
use crate::progress::follow_job;

use cutlist_core::{OperationKind, Worker};

use log::{info, warn};

/// Runs `cutlist generate`.
///
/// # Arguments
///
/// * `args` - Parsed generate arguments
/// * `file_logging` - A log file is open; mirror events into it
pub fn run_generate(args: GenerateArgs, file_logging: bool) -> CliResult<()> {
    let mut builder = project_config(&args.project)?
        .timeline_fps(args.timeline_fps)
        .resolution(args.resolution)
        .parallel_scan(args.parallel);
    if let Some(output) = &args.output {
        builder = builder.output_xml(output.clone());
    }
    if let Some(name) = &args.name {
        builder = builder.sequence_name(name.clone());
    }
    let session = open_session(&args.project, builder)?;
    info!(
        "Generating {} at {}",
        session.config().resolved_output_path().display(),
        args.resolution
    );

    let worker = Worker::new();
    let job = worker.submit(
        OperationKind::Generate,
        job_handlers(args.json, file_logging),
        move |events| {
            let mut session = session;
            let summary = session.scan_shot_list(events)?;
            if summary.errors > 0 {
                warn!(
                    "{} rows still need attention and will be left out of the timeline",
                    summary.errors
                );
            }
            session.generate(events)
        },
    )?;
    let report = follow_job(job, !args.json)?;

    if args.json {
        output::print_json(&output::compile_to_json(&report));
    } else {
        output::print_compile_summary(&report);
    }
    Ok(())
}
