// ============================================================================
// cutlist-core/src/media/descriptor.rs
// ============================================================================
//
// MEDIA DESCRIPTOR: Attributes of a Probed Source File
//
// Turns a raw inspector report into the handful of values the validator and
// the timeline compiler need: codec, frame size, source frame rate, frame
// count, embedded start timecode, audio track count and a color profile
// label.
//
// AI-ASSISTANT-INFO: Probe report to media descriptor conversion

// ---- External crate imports ----
use serde_json::{Map, Value};

// ---- Internal crate imports ----
use crate::error::CoreResult;
use crate::external::{MediaInspector, ProbeReport, ProbeStream};
use crate::timecode::FrameRate;

// ---- Standard library imports ----
use std::fmt;
use std::path::{Path, PathBuf};

/// Start timecode assumed when the file carries none.
pub const DEFAULT_START_TIMECODE: &str = "00:00:00:00";

/// Frame size assumed when the video stream does not declare one.
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Transfer characteristics that count as "standard" for classification.
const STANDARD_TRANSFERS: [&str; 5] = ["unknown", "bt709", "smpte170m", "bt470bg", "bt601"];
const REC601_NAMES: [&str; 2] = ["smpte170m", "bt601"];

/// Color profile label shown in the preview and written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColorProfile {
    Rec601,
    Rec709,
    /// A non-standard transfer characteristic, kept verbatim (e.g. `arib-std-b67`)
    Raw(String),
    #[default]
    NotAvailable,
}

impl ColorProfile {
    /// Classifies stream color metadata.
    ///
    /// A non-standard named transfer wins outright; then the 601 family by
    /// transfer or space; then 709 by transfer, space or primaries.
    pub fn classify(transfer: Option<&str>, space: Option<&str>, primaries: Option<&str>) -> Self {
        if let Some(transfer) = transfer.filter(|t| !t.is_empty()) {
            if !STANDARD_TRANSFERS.contains(&transfer) {
                return Self::Raw(transfer.to_string());
            }
        }

        let is_601 = |value: Option<&str>| value.is_some_and(|v| REC601_NAMES.contains(&v));
        if is_601(transfer) || is_601(space) {
            return Self::Rec601;
        }

        let is_709 = |value: Option<&str>| value == Some("bt709");
        if is_709(transfer) || is_709(space) || is_709(primaries) {
            return Self::Rec709;
        }

        Self::NotAvailable
    }

    /// Parses the label written by [`fmt::Display`].
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "" | "N/A" => Self::NotAvailable,
            "Rec.601" => Self::Rec601,
            "Rec.709" => Self::Rec709,
            other => Self::Raw(other.to_string()),
        }
    }
}

impl fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rec601 => write!(f, "Rec.601"),
            Self::Rec709 => write!(f, "Rec.709"),
            Self::Raw(value) => write!(f, "{value}"),
            Self::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Video stream attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    /// `None` when the declared rate is zero or unparsable
    pub frame_rate: Option<FrameRate>,
    pub frame_count: u64,
    pub color_profile: ColorProfile,
}

/// Everything learned about one source file from one probe.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDescriptor {
    pub path: PathBuf,
    /// Number of streams of any kind in the report
    pub stream_count: usize,
    /// First video stream, if any
    pub video: Option<VideoInfo>,
    pub audio_track_count: usize,
    pub start_timecode: String,
}

impl MediaDescriptor {
    /// Builds a descriptor from an inspector report.
    pub fn from_report(path: &Path, report: &ProbeReport) -> Self {
        let video_stream = report.video_stream();

        let start_timecode = video_stream
            .and_then(|stream| find_timecode_tag(&stream.tags))
            .or_else(|| report.format.as_ref().and_then(|format| find_timecode_tag(&format.tags)))
            .unwrap_or_else(|| DEFAULT_START_TIMECODE.to_string());

        Self {
            path: path.to_path_buf(),
            stream_count: report.streams.len(),
            video: video_stream.map(video_info),
            audio_track_count: report.audio_stream_count(),
            start_timecode,
        }
    }

    /// True when the probe returned no stream at all.
    pub fn is_empty(&self) -> bool {
        self.stream_count == 0
    }
}

/// Probes `path` through `inspector` and builds its descriptor.
///
/// # Arguments
///
/// * `inspector` - The media inspection collaborator
/// * `path` - Resolved media file
///
/// # Returns
///
/// * `Ok(MediaDescriptor)` - The probe succeeded (the report may still lack a video stream)
/// * `Err(CoreError)` - The tool is missing, exited non-zero or returned malformed output
pub fn probe(inspector: &dyn MediaInspector, path: &Path) -> CoreResult<MediaDescriptor> {
    let report = inspector.inspect(path)?;
    Ok(MediaDescriptor::from_report(path, &report))
}

fn video_info(stream: &ProbeStream) -> VideoInfo {
    let frame_rate = stream.r_frame_rate.as_deref().and_then(FrameRate::parse_ratio);

    VideoInfo {
        codec: stream.codec_name.clone().unwrap_or_default(),
        width: positive_dimension(stream.width).unwrap_or(DEFAULT_WIDTH),
        height: positive_dimension(stream.height).unwrap_or(DEFAULT_HEIGHT),
        frame_rate,
        frame_count: frame_count(stream, frame_rate),
        color_profile: ColorProfile::classify(
            stream.color_transfer.as_deref(),
            stream.color_space.as_deref(),
            stream.color_primaries.as_deref(),
        ),
    }
}

fn positive_dimension(value: Option<i64>) -> Option<u32> {
    value.filter(|v| *v > 0).and_then(|v| u32::try_from(v).ok())
}

/// Declared frame count, else `duration * fps` truncated, else 0.
fn frame_count(stream: &ProbeStream, frame_rate: Option<FrameRate>) -> u64 {
    let declared = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.trim().parse::<u64>().ok())
        .filter(|n| *n > 0);
    if let Some(count) = declared {
        return count;
    }

    let duration = stream.duration.as_deref().and_then(|d| d.trim().parse::<f64>().ok());
    match (duration, frame_rate) {
        (Some(seconds), Some(rate)) if seconds > 0.0 => (seconds * rate.as_f64()).trunc() as u64,
        _ => 0,
    }
}

fn find_timecode_tag(tags: &Map<String, Value>) -> Option<String> {
    tags.iter()
        .find(|(key, _)| key.to_lowercase().contains("timecode"))
        .map(|(_, value)| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{audio_only_report, video_report, with_format_tag, with_video_tag};
    use crate::external::ProbeFormat;

    #[test]
    fn test_color_profile_precedence() {
        assert_eq!(
            ColorProfile::classify(Some("arib-std-b67"), Some("bt709"), Some("bt709")),
            ColorProfile::Raw("arib-std-b67".to_string())
        );
        assert_eq!(ColorProfile::classify(Some("bt601"), None, None), ColorProfile::Rec601);
        assert_eq!(
            ColorProfile::classify(Some("unknown"), Some("smpte170m"), Some("bt709")),
            ColorProfile::Rec601
        );
        assert_eq!(ColorProfile::classify(None, None, Some("bt709")), ColorProfile::Rec709);
        assert_eq!(
            ColorProfile::classify(Some("bt470bg"), Some("bt470bg"), None),
            ColorProfile::NotAvailable
        );
        assert_eq!(ColorProfile::classify(None, None, None), ColorProfile::NotAvailable);
    }

    #[test]
    fn test_color_profile_labels() {
        for profile in [
            ColorProfile::Rec601,
            ColorProfile::Rec709,
            ColorProfile::Raw("smpte2084".to_string()),
            ColorProfile::NotAvailable,
        ] {
            assert_eq!(ColorProfile::from_label(&profile.to_string()), profile);
        }
    }

    #[test]
    fn test_descriptor_from_video_report() {
        let report = video_report("prores", 3840, 2160, "24000/1001", 480, 3);
        let descriptor = MediaDescriptor::from_report(Path::new("/v/a.mov"), &report);

        let video = descriptor.video.unwrap();
        assert_eq!(video.codec, "prores");
        assert_eq!((video.width, video.height), (3840, 2160));
        assert_eq!(video.frame_rate, FrameRate::new(24000, 1001));
        assert_eq!(video.frame_count, 480);
        assert_eq!(descriptor.audio_track_count, 3);
        assert_eq!(descriptor.start_timecode, DEFAULT_START_TIMECODE);
    }

    #[test]
    fn test_frame_count_falls_back_to_duration() {
        let mut report = video_report("h264", 1920, 1080, "25/1", 0, 0);
        report.streams[0].nb_frames = None;
        report.streams[0].duration = Some("4.02".to_string());
        let descriptor = MediaDescriptor::from_report(Path::new("a.mp4"), &report);
        assert_eq!(descriptor.video.unwrap().frame_count, 100);

        report.streams[0].duration = None;
        let descriptor = MediaDescriptor::from_report(Path::new("a.mp4"), &report);
        assert_eq!(descriptor.video.unwrap().frame_count, 0);
    }

    #[test]
    fn test_missing_dimensions_use_defaults() {
        let mut report = video_report("h264", 0, 0, "25/1", 10, 0);
        report.streams[0].height = None;
        let video = MediaDescriptor::from_report(Path::new("a.mp4"), &report).video.unwrap();
        assert_eq!((video.width, video.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_start_timecode_lookup_order() {
        let base = video_report("h264", 1920, 1080, "25/1", 10, 0);

        let stream_and_format = with_format_tag(
            with_video_tag(base.clone(), "TimeCode", "01:00:00:00"),
            "timecode",
            "02:00:00:00",
        );
        let descriptor = MediaDescriptor::from_report(Path::new("a.mov"), &stream_and_format);
        assert_eq!(descriptor.start_timecode, "01:00:00:00");

        let format_only = with_format_tag(base, "com.apple.quicktime.timecode", "10:00:00:00");
        let descriptor = MediaDescriptor::from_report(Path::new("a.mov"), &format_only);
        assert_eq!(descriptor.start_timecode, "10:00:00:00");
    }

    #[test]
    fn test_audio_only_and_empty_reports() {
        let descriptor = MediaDescriptor::from_report(Path::new("a.wav"), &audio_only_report(2));
        assert!(descriptor.video.is_none());
        assert_eq!(descriptor.audio_track_count, 2);
        assert!(!descriptor.is_empty());

        let empty = ProbeReport {
            streams: Vec::new(),
            format: Some(ProbeFormat::default()),
        };
        assert!(MediaDescriptor::from_report(Path::new("a.txt"), &empty).is_empty());
    }
}
