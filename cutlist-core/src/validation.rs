// ============================================================================
// cutlist-core/src/validation.rs
// ============================================================================
//
// ROW VALIDATION: Shot List Entry to Row Record State Machine
//
// This module reconciles one shot list entry against the media file it names.
// The transition order is fixed and short-circuits on the first failure:
//
//   empty filename      -> skipped
//   no file found       -> file not found   (correctable)
//   probe failed        -> probe error      (type title)
//   no usable stream    -> cannot open media (type title)
//   zero/unparsable fps -> invalid fps
//   range unparsable    -> time format error (correctable)
//   in >= out           -> out before in     (correctable)
//   otherwise           -> ok                (type clip)
//
// Validation is a pure function of (filename, range) plus disk and probe
// state, so re-validating an unchanged row yields an identical record.
//
// AI-ASSISTANT-INFO: Row validator state machine and row record types

// ---- External crate imports ----
use serde::{Deserialize, Serialize};

// ---- Internal crate imports ----
use crate::external::MediaInspector;
use crate::media::{self, ColorProfile, descriptor};
use crate::timecode::{self, FrameRate};

// ---- Standard library imports ----
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// ROW TYPES AND STATUSES
// ============================================================================

/// What a row contributes to the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Clip,
    Gap,
    Title,
    Skipped,
}

impl RowType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Gap => "gap",
            Self::Title => "title",
            Self::Skipped => "skipped",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "clip" => Some(Self::Clip),
            "gap" => Some(Self::Gap),
            "title" => Some(Self::Title),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

const PROBE_ERROR_PREFIX: &str = "FFProbe Error: ";

/// Terminal classification of a row after validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowStatus {
    Ok,
    #[default]
    Skipped,
    FileNotFound,
    /// Carries the inspector's failure detail
    ProbeError(String),
    CannotOpenMedia,
    InvalidFps,
    TimeFormatError,
    OutBeforeIn,
    /// Override set by remediation
    Gap,
}

impl RowStatus {
    /// The label stored in the shot list's `status` column.
    pub fn label(&self) -> String {
        match self {
            Self::Ok => "ok".to_string(),
            Self::Skipped => "skipped".to_string(),
            Self::FileNotFound => "File not found".to_string(),
            Self::ProbeError(detail) => format!("{PROBE_ERROR_PREFIX}{detail}"),
            Self::CannotOpenMedia => "Cannot open media".to_string(),
            Self::InvalidFps => "Invalid FPS (0)".to_string(),
            Self::TimeFormatError => "Time format error".to_string(),
            Self::OutBeforeIn => "Out time < In time".to_string(),
            Self::Gap => "gap".to_string(),
        }
    }

    /// Parses a stored label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if let Some(detail) = label.strip_prefix(PROBE_ERROR_PREFIX) {
            return Some(Self::ProbeError(detail.to_string()));
        }
        match label.to_lowercase().as_str() {
            "ok" => Some(Self::Ok),
            "skipped" => Some(Self::Skipped),
            "file not found" => Some(Self::FileNotFound),
            "cannot open media" => Some(Self::CannotOpenMedia),
            "invalid fps (0)" => Some(Self::InvalidFps),
            "time format error" => Some(Self::TimeFormatError),
            "out time < in time" => Some(Self::OutBeforeIn),
            "gap" => Some(Self::Gap),
            "ffprobe error:" => Some(Self::ProbeError(String::new())),
            _ => None,
        }
    }

    /// True for every status the remediation loop lists (not ok, skipped or gap).
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Ok | Self::Skipped | Self::Gap)
    }

    /// Errors that remediation can repair by editing the row or supplying the file.
    pub fn is_correctable(&self) -> bool {
        matches!(self, Self::FileNotFound | Self::TimeFormatError | Self::OutBeforeIn)
    }

    /// Short machine-friendly name, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::FileNotFound => "file_not_found",
            Self::ProbeError(_) => "probe_error",
            Self::CannotOpenMedia => "cannot_open_media",
            Self::InvalidFps => "invalid_fps",
            Self::TimeFormatError => "time_format_error",
            Self::OutBeforeIn => "out_before_in",
            Self::Gap => "gap",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ============================================================================
// SHOT ENTRIES AND ROW RECORDS
// ============================================================================

/// A raw shot list row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShotEntry {
    pub filename: String,
    pub range: String,
    /// The stored status was `gap`; the row stays a gap without probing.
    pub gap_override: bool,
}

impl ShotEntry {
    pub fn new(filename: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            range: range.into(),
            gap_override: false,
        }
    }
}

/// One validated row: the shot entry plus everything learned from its media.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub filename: String,
    pub range: String,
    pub row_type: Option<RowType>,
    pub status: RowStatus,
    pub full_path: Option<PathBuf>,
    pub codec: String,
    pub color_profile: ColorProfile,
    /// Source frame rate as resolved by the probe
    pub frame_rate: Option<FrameRate>,
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
    pub start_timecode: String,
    pub audio_tracks: usize,
}

impl Default for RowRecord {
    fn default() -> Self {
        Self {
            filename: String::new(),
            range: String::new(),
            row_type: None,
            status: RowStatus::default(),
            full_path: None,
            codec: String::new(),
            color_profile: ColorProfile::NotAvailable,
            frame_rate: None,
            frame_count: 0,
            width: descriptor::DEFAULT_WIDTH,
            height: descriptor::DEFAULT_HEIGHT,
            start_timecode: descriptor::DEFAULT_START_TIMECODE.to_string(),
            audio_tracks: 0,
        }
    }
}

impl RowRecord {
    fn from_fields(filename: &str, range: &str) -> Self {
        Self {
            filename: filename.to_string(),
            range: range.to_string(),
            ..Self::default()
        }
    }

    /// A gap row keeping its texts and nothing else.
    pub fn gap(filename: &str, range: &str) -> Self {
        Self {
            row_type: Some(RowType::Gap),
            status: RowStatus::Gap,
            ..Self::from_fields(filename, range)
        }
    }

    /// Returns this row converted to a gap, keeping its media fields.
    pub fn into_gap(self) -> Self {
        Self {
            row_type: Some(RowType::Gap),
            status: RowStatus::Gap,
            ..self
        }
    }

    pub fn is_ok_clip(&self) -> bool {
        self.status == RowStatus::Ok && self.row_type == Some(RowType::Clip)
    }

    pub fn is_gap(&self) -> bool {
        self.status == RowStatus::Gap && self.row_type == Some(RowType::Gap)
    }

    /// The file name as shown in progress output.
    pub fn display_name(&self) -> String {
        Path::new(self.filename.trim())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates rows against a video folder through a media inspector.
pub struct Validator<'a> {
    video_dir: &'a Path,
    inspector: &'a dyn MediaInspector,
}

impl<'a> Validator<'a> {
    pub fn new(video_dir: &'a Path, inspector: &'a dyn MediaInspector) -> Self {
        Self { video_dir, inspector }
    }

    /// Validates a shot entry, honoring a stored gap override.
    pub fn validate_entry(&self, entry: &ShotEntry) -> RowRecord {
        if entry.gap_override {
            return RowRecord::gap(entry.filename.trim(), entry.range.trim());
        }
        self.validate(&entry.filename, &entry.range)
    }

    /// Runs the validation state machine for one row.
    ///
    /// # Arguments
    ///
    /// * `filename` - Requested media file name
    /// * `range` - The row's `"<in> - <out>"` text
    ///
    /// # Returns
    ///
    /// * A fresh `RowRecord`; validation never fails, problems become the row status
    pub fn validate(&self, filename: &str, range: &str) -> RowRecord {
        let filename = filename.trim();
        let range = range.trim();
        let mut row = RowRecord::from_fields(filename, range);

        // 1. Nothing to look up
        if filename.is_empty() {
            row.row_type = Some(RowType::Skipped);
            row.status = RowStatus::Skipped;
            return row;
        }

        // 2. Resolve on disk
        let Some(path) = media::resolve(self.video_dir, filename) else {
            row.status = RowStatus::FileNotFound;
            return row;
        };
        row.full_path = Some(path.clone());
        row.row_type = Some(RowType::Clip);

        // 3. Probe
        let descriptor = match media::probe(self.inspector, &path) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                log::warn!("Probe failed for {}: {}", path.display(), e);
                row.row_type = Some(RowType::Title);
                row.status = RowStatus::ProbeError(e.to_string());
                return row;
            }
        };
        row.audio_tracks = descriptor.audio_track_count;
        row.start_timecode = descriptor.start_timecode.clone();

        // 4. Usable video stream (an empty report has none)
        let video = match descriptor.video {
            Some(video) => video,
            None => {
                row.codec = extension_of(filename);
                row.row_type = Some(RowType::Title);
                row.status = RowStatus::CannotOpenMedia;
                return row;
            }
        };
        row.codec = video.codec;
        row.width = video.width;
        row.height = video.height;
        row.color_profile = video.color_profile;

        // 5. Frame rate
        let Some(rate) = video.frame_rate else {
            row.status = RowStatus::InvalidFps;
            return row;
        };
        row.frame_rate = Some(rate);
        row.frame_count = video.frame_count;

        // 6 + 7. Range
        // Ranges use the three-decimal rate the store keeps, so reloads agree
        row.status = match timecode::parse_range(range, rate.rounded().as_f64()) {
            Err(e) => {
                log::debug!("Range '{}' of '{}' rejected: {}", range, filename, e);
                RowStatus::TimeFormatError
            }
            Ok((in_frame, out_frame)) if in_frame >= out_frame => RowStatus::OutBeforeIn,
            Ok(_) => RowStatus::Ok,
        };
        row
    }
}

/// File extension with its dot, or an empty string.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
