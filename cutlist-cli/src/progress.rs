// ============================================================================
// cutlist-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Terminal progress bars fed by worker events
//
// Scan and generate jobs run on the core's worker thread. The main thread
// drains the job's event channel here and turns the events into indicatif
// progress bars: a percentage bar with the current filename while rows are
// validated, a spinner while the timeline compiles, and a byte bar for the
// remediation copy.
//
// AI-ASSISTANT-INFO: Event-driven progress bars for the CLI

// ---- External crate imports ----
use cutlist_core::{Event, JobHandle};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::debug;

// ---- Internal crate imports ----
use crate::error::CliResult;

// ---- Standard library imports ----
use std::time::Duration;

const SCAN_TEMPLATE: &str = "  Scanning: {percent:>3}% [{bar:30}] {msg}";
const COPY_TEMPLATE: &str = "  Copying:  {percent:>3}% [{bar:30}] {bytes}/{total_bytes}";
const COMPILE_TEMPLATE: &str = "  {spinner} {msg}";

/// Which bar is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scan,
    Compile,
    Copy,
}

// ============================================================================
// PROGRESS REPORTER
// ============================================================================

/// Turns core events into one progress bar at a time.
pub struct ProgressReporter {
    visible: bool,
    bar: Option<(Phase, ProgressBar)>,
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.")
}

impl ProgressReporter {
    /// Creates a reporter. A hidden reporter tracks the same state without drawing.
    pub fn new(visible: bool) -> Self {
        Self { visible, bar: None }
    }

    fn start(&mut self, phase: Phase, length: u64, template: &str) -> &ProgressBar {
        self.clear();
        let target = if self.visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(length), target);
        bar.set_style(style(template));
        &self.bar.insert((phase, bar)).1
    }

    fn current(&self, phase: Phase) -> Option<&ProgressBar> {
        match &self.bar {
            Some((current, bar)) if *current == phase => Some(bar),
            _ => None,
        }
    }

    /// Position of the bar on screen, if any.
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(|(_, bar)| bar.position())
    }

    /// Message of the bar on screen, if any.
    pub fn message(&self) -> Option<String> {
        self.bar.as_ref().map(|(_, bar)| bar.message())
    }

    /// Updates the display for one event.
    pub fn handle(&mut self, event: &Event) {
        match event {
            Event::ScanStarted { total } => {
                debug!("Scan of {} rows started", total);
                self.start(Phase::Scan, 100, SCAN_TEMPLATE);
            }
            Event::RowValidated { percent, filename, .. } => {
                if self.current(Phase::Scan).is_none() {
                    self.start(Phase::Scan, 100, SCAN_TEMPLATE);
                }
                if let Some(bar) = self.current(Phase::Scan) {
                    // rows finish out of order in a parallel scan; never move back
                    let position = (percent.round() as u64).min(100);
                    if position >= bar.position() {
                        bar.set_position(position);
                    }
                    bar.set_message(filename.clone());
                }
            }
            Event::ScanComplete { .. }
            | Event::CompileComplete { .. }
            | Event::CopyComplete { .. } => {
                self.clear();
            }
            Event::CompileStarted { rows, timeline_fps } => {
                let bar = self.start(Phase::Compile, 0, COMPILE_TEMPLATE);
                bar.set_message(format!("Compiling {} rows at {} fps", rows, timeline_fps));
                bar.enable_steady_tick(Duration::from_millis(100));
            }
            Event::CopyProgress { copied, total } => {
                if self.current(Phase::Copy).is_none() {
                    self.start(Phase::Copy, *total, COPY_TEMPLATE);
                }
                if let Some(bar) = self.current(Phase::Copy) {
                    bar.set_position(*copied);
                }
            }
            // Logged by the core; the summary lists them again.
            Event::RowDropped { .. } | Event::Warning { .. } | Event::Error { .. } => {}
        }
    }

    /// Removes whatever bar is on screen.
    pub fn clear(&mut self) {
        if let Some((_, bar)) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Draws the job's events until the job ends, then returns its result.
///
/// # Arguments
///
/// * `job` - A job submitted to the core worker
/// * `visible` - Draw bars; off for JSON output
pub fn follow_job<T>(job: JobHandle<T>, visible: bool) -> CliResult<T> {
    let mut reporter = ProgressReporter::new(visible);
    for event in job.events().iter() {
        reporter.handle(&event);
    }
    reporter.clear();
    job.join()
}
