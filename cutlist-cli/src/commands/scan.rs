//! Implementation of the 'scan' subcommand.
//!
//! Validates every row of the shot list on the worker thread, shows the
//! preview table and the rows needing attention, optionally converts those
//! rows to gaps, and rewrites the store.

use crate::cli::ScanArgs;
use crate::commands::{job_handlers, open_session, project_config};
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use crate::progress::follow_job;

use cutlist_core::{OperationKind, Worker};

use log::info;
use serde_json::json;

/// Runs `cutlist scan`.
///
/// # Arguments
///
/// * `args` - Parsed scan arguments
/// * `file_logging` - A log file is open; mirror events into it
pub fn run_scan(args: ScanArgs, file_logging: bool) -> CliResult<()> {
    let builder = project_config(&args.project)?
        .timeline_fps(args.timeline_fps)
        .parallel_scan(args.parallel);
    let session = open_session(&args.project, builder)?;
    let store = args.project.shot_list.clone();
    info!("Scanning {} against {}", store.display(), args.project.video_dir.display());

    let worker = Worker::new();
    let job = worker.submit(
        OperationKind::Scan,
        job_handlers(args.json, file_logging),
        move |events| {
            let mut session = session;
            session.scan_shot_list(events)?;
            Ok(session)
        },
    )?;
    let mut session = follow_job(job, !args.json)?;
    let summary = session.summary();

    if args.json {
        for (position, row) in session.rows().iter().enumerate() {
            output::print_json(&output::row_to_json(position, row));
        }
    } else {
        output::print_preview(session.rows());
        let common_fps = session.most_common_fps().map(|rate| rate.to_string());
        output::print_scan_summary(&summary, common_fps);
        output::print_status("Timeline FPS", &session.timeline_frame_rate().to_string());
    }

    if args.gap_errors {
        let report = session.bulk_force_gap(0);
        if args.json {
            let rejected: Vec<_> = report
                .rejected
                .iter()
                .map(|(index, reason)| json!({ "row": index + 1, "reason": reason }))
                .collect();
            output::print_json(&json!({
                "type": "bulk_gap",
                "converted": report.converted.iter().map(|index| index + 1).collect::<Vec<_>>(),
                "rejected": rejected,
            }));
        } else {
            output::print_bulk_report(&report);
        }
    }

    if !args.json {
        output::print_error_list(&session.list_errors());
    }

    session.save().store_context("Cannot save", &store)?;
    if !args.json {
        output::print_success(&format!("Saved {}", store.display()));
    }
    Ok(())
}
