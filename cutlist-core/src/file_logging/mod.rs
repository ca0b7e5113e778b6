pub mod setup;

use crate::events::{Event, EventHandler};
use log::{debug, error, info, warn};
use std::sync::{Mutex, MutexGuard};

/// Percentage step between logged progress lines.
const PROGRESS_STEP: u32 = 10;

/// Writes events to the log, thinning per-row and per-chunk progress to
/// every [`PROGRESS_STEP`] percent so long scans keep readable log files.
pub struct FileLoggingHandler {
    last_scan_percent: Mutex<Option<u32>>,
    last_copy_percent: Mutex<Option<u32>>,
}

impl Default for FileLoggingHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// True when `percent` crossed the next step after `last`, or finished.
fn crossed_step(last: &mut Option<u32>, percent: u32) -> bool {
    let due = match *last {
        None => true,
        Some(previous) => percent >= previous + PROGRESS_STEP || (percent >= 100 && previous < 100),
    };
    if due {
        *last = Some(percent);
    }
    due
}

impl FileLoggingHandler {
    pub fn new() -> Self {
        Self {
            last_scan_percent: Mutex::new(None),
            last_copy_percent: Mutex::new(None),
        }
    }

    pub fn reset_progress_state(&self) {
        *lock(&self.last_scan_percent) = None;
        *lock(&self.last_copy_percent) = None;
    }
}

impl EventHandler for FileLoggingHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::ScanStarted { total } => {
                self.reset_progress_state();
                info!("Starting scan of {} rows", total);
            }

            Event::RowValidated {
                index,
                total,
                percent,
                filename,
                status,
            } => {
                debug!("Validated row {}/{} '{}': {}", index + 1, total, filename, status);
                if crossed_step(&mut lock(&self.last_scan_percent), *percent as u32) {
                    info!("Scan progress: {:.0}% ({}/{})", percent, index + 1, total);
                }
            }

            Event::ScanComplete {
                total,
                ok,
                errors,
                most_common_fps,
            } => {
                info!("Scan complete: {} rows, {} ok, {} need attention", total, ok, errors);
                if let Some(fps) = most_common_fps {
                    info!("Most common source frame rate: {}", fps);
                }
            }

            Event::CompileStarted { rows, timeline_fps } => {
                info!("Compiling timeline from {} rows at {} fps", rows, timeline_fps);
            }

            Event::RowDropped { index, filename, reason } => {
                warn!("Row {} ('{}') left out of the timeline: {}", index + 1, filename, reason);
            }

            Event::CompileComplete {
                clips,
                duration_frames,
                output_path,
            } => {
                info!("Timeline complete: {} clips, {} frames", clips, duration_frames);
                info!("Output saved to: {}", output_path);
            }

            Event::CopyProgress { copied, total } => {
                let percent = if *total == 0 {
                    100
                } else {
                    (*copied as f64 / *total as f64 * 100.0) as u32
                };
                if crossed_step(&mut lock(&self.last_copy_percent), percent) {
                    info!("Copy progress: {}% ({} of {} bytes)", percent, copied, total);
                }
            }

            Event::CopyComplete { destination } => {
                *lock(&self.last_copy_percent) = None;
                info!("Copied file to {}", destination.display());
            }

            Event::Warning { message } => {
                warn!("{}", message);
            }

            Event::Error { title, message } => {
                error!("{}: {}", title, message);
            }
        }
    }
}
