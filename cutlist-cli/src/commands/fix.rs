//! Implementation of the 'fix' subcommand.
//!
//! Reloads the stored rows without probing, applies one correction to a
//! single row (new texts, gap, or copying in its missing file) and rewrites
//! the store. Other rows are left exactly as stored.

use crate::cli::FixArgs;
use crate::commands::{job_handlers, open_session, project_config};
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use crate::progress::follow_job;

use cutlist_core::{CoreError, OperationKind, RowRecord, Worker};

use log::info;

/// Runs `cutlist fix`.
///
/// # Arguments
///
/// * `args` - Parsed fix arguments; `--row` counts from 1
/// * `file_logging` - A log file is open; mirror copy events into it
pub fn run_fix(args: FixArgs, file_logging: bool) -> CliResult<()> {
    let builder = project_config(&args.project)?;
    let mut session = open_session(&args.project, builder)?;
    let store = args.project.shot_list.clone();
    session.load_records().store_context("Cannot read", &store)?;

    let row_count = session.rows().len();
    let index = usize::try_from(args.row)
        .ok()
        .and_then(|row| row.checked_sub(1))
        .filter(|index| *index < row_count)
        .ok_or_else(|| {
            CoreError::OperationFailed(format!(
                "Row {} does not exist; the shot list has {} rows",
                args.row, row_count
            ))
        })?;
    let current = session.rows()[index].clone();

    let (session, updated) = if let Some(source) = args.copy_from.clone() {
        info!("Copying {} for row {}", source.display(), args.row);
        let worker = Worker::new();
        let job = worker.submit(
            OperationKind::FileCopy,
            job_handlers(false, file_logging),
            move |events| {
                let mut session = session;
                let row = session.copy_missing_file(index, &source, events)?;
                Ok((session, row))
            },
        )?;
        follow_job(job, true).row_context(args.row)?
    } else if args.gap {
        let gap = session.force_gap(index).row_context(args.row)?;
        session.replace_row(index, gap.clone())?;
        (session, gap)
    } else {
        let filename = args.filename.clone().unwrap_or_else(|| current.filename.clone());
        let range = args.range.clone().unwrap_or_else(|| current.range.clone());
        let row: RowRecord = session.revalidate(index, &filename, &range).row_context(args.row)?;
        session.replace_row(index, row.clone())?;
        (session, row)
    };

    info!(
        "Row {} changed from '{}' to '{}'",
        args.row,
        current.status.label(),
        updated.status.label()
    );
    session.save().store_context("Cannot save", &store)?;
    output::print_row_saved(index, &updated, &store);
    if updated.status.is_error() {
        output::print_failure(&format!("Row {} still needs attention", args.row));
    }
    Ok(())
}
