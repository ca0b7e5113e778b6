// ============================================================================
// cutlist-core/src/session.rs
// ============================================================================
//
// SESSION: The Current Batch and Everything Done To It
//
// A Session owns the configuration, the media inspector and the current list
// of validated rows. Scans replace the rows; the correction operations
// (revalidate, force gap, bulk force gap, remediation copy) work on single
// rows by index and never reorder the list. The frame-rate histogram of the
// last scan decides the timeline rate when the configuration asks for `Auto`.
//
// `revalidate` and `force_gap` are pure: they return a new record and the
// caller installs it with `replace_row`. `bulk_force_gap` and
// `copy_missing_file` install their results themselves.
//
// AI-ASSISTANT-INFO: Batch state, correction contract, scan/generate drivers

// ---- External crate imports ----
use log::{debug, info, warn};
use rayon::prelude::*;
use tempfile::NamedTempFile;

// ---- Internal crate imports ----
use crate::config::{CoreConfig, DEFAULT_TIMELINE_FPS, TimelineFps};
use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};
use crate::external::MediaInspector;
use crate::store;
use crate::timecode::{self, FrameRate};
use crate::timeline::{self, CompileReport, TimelineCompiler};
use crate::utils::{format_bytes, get_filename_safe};
use crate::validation::{RowRecord, RowStatus, ShotEntry, Validator};

// ---- Standard library imports ----
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts from one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub total: usize,
    pub ok: usize,
    /// Rows that `list_errors` would return
    pub errors: usize,
}

/// Outcome of converting the remaining listed errors to gaps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkGapReport {
    /// Row indices now holding gaps
    pub converted: Vec<usize>,
    /// Row indices left in their error state, with the reason
    pub rejected: Vec<(usize, String)>,
}

/// Result of a generate run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub compile: CompileReport,
    pub output_path: PathBuf,
    pub timeline_fps: FrameRate,
}

/// The current batch of rows plus the collaborators needed to work on it.
pub struct Session {
    config: CoreConfig,
    inspector: Arc<dyn MediaInspector>,
    rows: Vec<RowRecord>,
    most_common_fps: Option<FrameRate>,
}

impl Session {
    pub fn new(config: CoreConfig, inspector: Arc<dyn MediaInspector>) -> Self {
        Self {
            config,
            inspector,
            rows: Vec::new(),
            most_common_fps: None,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// Most common source rate seen in the current rows, at 3-decimal precision.
    pub fn most_common_fps(&self) -> Option<FrameRate> {
        self.most_common_fps
    }

    /// The rate the timeline is built on.
    ///
    /// A fixed configuration wins; `Auto` uses the most common source rate and
    /// falls back to 25 fps when no rate has been seen.
    pub fn timeline_frame_rate(&self) -> FrameRate {
        match self.config.timeline_fps {
            TimelineFps::Fixed(rate) => rate,
            TimelineFps::Auto => self.most_common_fps.unwrap_or(DEFAULT_TIMELINE_FPS),
        }
    }

    fn set_rows(&mut self, rows: Vec<RowRecord>) {
        self.most_common_fps = most_common_rate(&rows);
        self.rows = rows;
    }

    // ========================================================================
    // SCAN
    // ========================================================================

    /// Validates every entry and makes the results the current rows.
    ///
    /// Emits `ScanStarted`, one `RowValidated` per row and `ScanComplete`.
    /// With `parallel_scan` rows are validated on the rayon pool; the row
    /// order is kept but `RowValidated` events arrive in completion order.
    pub fn scan(&mut self, entries: &[ShotEntry], events: &EventDispatcher) -> ScanSummary {
        let total = entries.len();
        events.emit(Event::ScanStarted { total });
        info!("Scanning {} rows against {}", total, self.config.video_dir.display());

        if let Err(e) = self.inspector.check_available() {
            let message = format!("{e}; every row with a file will be reported as a probe error");
            warn!("{}", message);
            events.emit(Event::Warning { message });
        }

        let rows = {
            let validator = Validator::new(&self.config.video_dir, self.inspector.as_ref());
            let finished = AtomicUsize::new(0);
            let validate_one = |(index, entry): (usize, &ShotEntry)| {
                let row = validator.validate_entry(entry);
                let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                debug!("Row {}/{} '{}': {}", index + 1, total, row.filename, row.status);
                events.emit(Event::RowValidated {
                    index,
                    total,
                    percent: done as f32 / total as f32 * 100.0,
                    filename: row.display_name(),
                    status: row.status.kind().to_string(),
                });
                row
            };

            if self.config.parallel_scan {
                entries.par_iter().enumerate().map(&validate_one).collect::<Vec<_>>()
            } else {
                entries.iter().enumerate().map(&validate_one).collect::<Vec<_>>()
            }
        };
        self.set_rows(rows);

        let summary = self.summary();
        if let Some(rate) = self.most_common_fps {
            info!("Most common source frame rate: {}", rate);
        }
        events.emit(Event::ScanComplete {
            total: summary.total,
            ok: summary.ok,
            errors: summary.errors,
            most_common_fps: self.most_common_fps.map(|rate| rate.to_string()),
        });
        summary
    }

    /// Reads the shot list from the configured store and scans it.
    pub fn scan_shot_list(&mut self, events: &EventDispatcher) -> CoreResult<ScanSummary> {
        let entries = store::read_entries(&self.config.shot_list)?;
        Ok(self.scan(&entries, events))
    }

    /// Counts for the current rows.
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            total: self.rows.len(),
            ok: self.rows.iter().filter(|row| row.is_ok_clip()).count(),
            errors: self.list_errors().len(),
        }
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Replaces the current rows with the records stored in the shot list, without probing.
    pub fn load_records(&mut self) -> CoreResult<()> {
        let rows = store::read_records(&self.config.shot_list)?;
        info!("Loaded {} stored rows from {}", rows.len(), self.config.shot_list.display());
        self.set_rows(rows);
        Ok(())
    }

    /// Rewrites the shot list with the current rows.
    pub fn save(&self) -> CoreResult<()> {
        store::write_records(&self.config.shot_list, &self.rows)?;
        info!("Saved {} rows to {}", self.rows.len(), self.config.shot_list.display());
        Ok(())
    }

    // ========================================================================
    // CORRECTION CONTRACT
    // ========================================================================

    /// Every row that needs attention, with its index in the batch.
    pub fn list_errors(&self) -> Vec<(usize, RowRecord)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.status.is_error() && !row.filename.trim().is_empty())
            .map(|(index, row)| (index, row.clone()))
            .collect()
    }

    fn row(&self, index: usize) -> CoreResult<&RowRecord> {
        self.rows.get(index).ok_or(CoreError::RowOutOfRange(index))
    }

    /// Validates new texts for an existing row and returns the new record.
    ///
    /// The current rows are left untouched; install the result with [`Session::replace_row`].
    pub fn revalidate(&self, index: usize, filename: &str, range: &str) -> CoreResult<RowRecord> {
        self.row(index)?;
        let validator = Validator::new(&self.config.video_dir, self.inspector.as_ref());
        Ok(validator.validate(filename, range))
    }

    /// Installs `row` at `index`.
    pub fn replace_row(&mut self, index: usize, row: RowRecord) -> CoreResult<()> {
        let slot = self.rows.get_mut(index).ok_or(CoreError::RowOutOfRange(index))?;
        *slot = row;
        Ok(())
    }

    /// The row at `index` converted to a gap.
    ///
    /// # Errors
    ///
    /// * `CoreError::GapRejected` - The range does not parse, or has no positive
    ///   length, at the timeline rate
    pub fn force_gap(&self, index: usize) -> CoreResult<RowRecord> {
        let row = self.row(index)?;
        let fps = self.timeline_frame_rate().rounded().as_f64();
        let (in_frame, out_frame) =
            timecode::parse_range(&row.range, fps).map_err(|e| CoreError::GapRejected {
                index,
                reason: e.to_string(),
            })?;
        if out_frame <= in_frame {
            return Err(CoreError::GapRejected {
                index,
                reason: "duration is not positive".to_string(),
            });
        }
        Ok(row.clone().into_gap())
    }

    /// Converts every listed error from `from_position` in [`Session::list_errors`]
    /// onwards to a gap.
    ///
    /// Rows whose range fails the gap check keep their error status and are reported.
    pub fn bulk_force_gap(&mut self, from_position: usize) -> BulkGapReport {
        let mut report = BulkGapReport::default();
        let targets: Vec<usize> = self
            .list_errors()
            .into_iter()
            .skip(from_position)
            .map(|(index, _)| index)
            .collect();

        for index in targets {
            match self.force_gap(index) {
                Ok(gap) => {
                    self.rows[index] = gap;
                    report.converted.push(index);
                }
                Err(e) => {
                    warn!("Row {} stays in error: {}", index + 1, e);
                    report.rejected.push((index, e.to_string()));
                }
            }
        }
        info!(
            "Converted {} rows to gaps, {} rejected",
            report.converted.len(),
            report.rejected.len()
        );
        report
    }

    /// Copies the file a row is missing into the video folder, then re-validates that row.
    ///
    /// # Arguments
    ///
    /// * `index` - Row whose file is missing
    /// * `source` - File to copy; its name must equal the row's filename
    /// * `events` - Receives `CopyProgress` after each chunk and `CopyComplete`
    ///
    /// # Returns
    ///
    /// * `Ok(RowRecord)` - The re-validated row, already installed at `index`
    /// * `Err(CoreError)` - The row is not missing its file, the name does not
    ///   match, the destination already exists, or an IO failure
    ///
    /// The copy lands in a temporary file inside the video folder and is only
    /// renamed into place once complete.
    pub fn copy_missing_file(
        &mut self,
        index: usize,
        source: &Path,
        events: &EventDispatcher,
    ) -> CoreResult<RowRecord> {
        let row = self.row(index)?;
        if row.status != RowStatus::FileNotFound {
            return Err(CoreError::PathError(format!(
                "row {} is '{}', only rows whose file is missing can be copied into place",
                index + 1,
                row.status.label()
            )));
        }
        let (wanted, range) = (row.filename.trim().to_string(), row.range.clone());

        let source_name = get_filename_safe(source)?;
        if source_name != wanted {
            return Err(CoreError::PathError(format!(
                "selected file '{source_name}' does not match the missing file '{wanted}'"
            )));
        }
        if !self.config.video_dir.is_dir() {
            return Err(CoreError::PathError(format!(
                "video folder '{}' is not a directory",
                self.config.video_dir.display()
            )));
        }

        let destination = self.config.video_dir.join(&source_name);
        if let (Ok(from), Ok(to)) = (source.canonicalize(), destination.canonicalize()) {
            if from == to {
                return Err(CoreError::PathError(format!(
                    "'{}' is already the file in the video folder",
                    source.display()
                )));
            }
        }
        if destination.exists() {
            return Err(CoreError::PathError(format!(
                "'{}' already exists; re-scan the shot list instead of copying",
                destination.display()
            )));
        }

        let copied = copy_in_chunks(source, &destination, self.config.copy_chunk_size, events)?;
        info!("Copied {} to {}", format_bytes(copied), destination.display());
        events.emit(Event::CopyComplete {
            destination: destination.clone(),
        });

        let updated = self.revalidate(index, &wanted, &range)?;
        self.replace_row(index, updated.clone())?;
        Ok(updated)
    }

    // ========================================================================
    // GENERATE
    // ========================================================================

    /// Compiles the current rows and writes the interchange document.
    pub fn generate(&self, events: &EventDispatcher) -> CoreResult<GenerateReport> {
        if self.rows.is_empty() {
            return Err(CoreError::OperationFailed(
                "no rows to compile; scan the shot list first".to_string(),
            ));
        }

        let timeline_fps = self.timeline_frame_rate();
        events.emit(Event::CompileStarted {
            rows: self.rows.len(),
            timeline_fps: timeline_fps.to_string(),
        });
        info!("Compiling {} rows at {} fps", self.rows.len(), timeline_fps);

        let compiler = TimelineCompiler::new(
            timeline_fps,
            self.config.resolution,
            self.config.resolved_sequence_name(),
        );
        let compile = compiler.compile(&self.rows, events);

        let output_path = self.config.resolved_output_path();
        timeline::write_sequence(&output_path, &compile.sequence)?;

        events.emit(Event::CompileComplete {
            clips: compile.clips,
            duration_frames: compile.sequence.duration,
            output_path: output_path.display().to_string(),
        });
        Ok(GenerateReport {
            compile,
            output_path,
            timeline_fps,
        })
    }
}

/// Most frequent rate at 3-decimal precision; ties go to the rate seen first.
fn most_common_rate(rows: &[RowRecord]) -> Option<FrameRate> {
    let mut counts: Vec<(FrameRate, usize)> = Vec::new();
    for rate in rows.iter().filter_map(|row| row.frame_rate).map(FrameRate::rounded) {
        match counts.iter_mut().find(|(seen, _)| *seen == rate) {
            Some((_, count)) => *count += 1,
            None => counts.push((rate, 1)),
        }
    }

    let mut best: Option<(FrameRate, usize)> = None;
    for (rate, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((rate, count));
        }
    }
    best.map(|(rate, _)| rate)
}

fn copy_in_chunks(
    source: &Path,
    destination: &Path,
    chunk_size: usize,
    events: &EventDispatcher,
) -> CoreResult<u64> {
    let total = std::fs::metadata(source)?.len();
    let mut reader = File::open(source)?;
    let folder = destination.parent().ok_or_else(|| {
        CoreError::PathError(format!("'{}' has no parent folder", destination.display()))
    })?;
    let mut writer = NamedTempFile::new_in(folder)?;
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut copied: u64 = 0;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.write_all(&buffer[..read])?;
        copied += read as u64;
        events.emit(Event::CopyProgress { copied, total });
    }
    writer.flush()?;
    writer
        .persist_noclobber(destination)
        .map_err(|e| CoreError::Io(e.error))?;
    Ok(copied)
}
