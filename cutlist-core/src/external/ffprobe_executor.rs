//! ffprobe integration for media inspection.
//!
//! The inspector runs `ffprobe -show_streams -show_format` with JSON output
//! and deserializes the subset of fields the validator needs. Tag maps are
//! kept in document order so "first matching tag" lookups are stable.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::Path;
use std::process::Command;

/// One stream entry of an ffprobe report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    /// Declared rate as a `"num/den"` string
    #[serde(default)]
    pub r_frame_rate: Option<String>,
    #[serde(default)]
    pub nb_frames: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub color_transfer: Option<String>,
    #[serde(default)]
    pub color_space: Option<String>,
    #[serde(default)]
    pub color_primaries: Option<String>,
    #[serde(default)]
    pub tags: Map<String, Value>,
}

impl ProbeStream {
    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    pub fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }
}

/// Container-level section of an ffprobe report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeFormat {
    #[serde(default)]
    pub format_name: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub tags: Map<String, Value>,
}

/// Structured report returned by a [`MediaInspector`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
    #[serde(default)]
    pub format: Option<ProbeFormat>,
}

impl ProbeReport {
    /// Parses raw ffprobe JSON output.
    pub fn from_json(bytes: &[u8]) -> CoreResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::JsonParseError(e.to_string()))
    }

    /// The first video stream, if any.
    pub fn video_stream(&self) -> Option<&ProbeStream> {
        self.streams.iter().find(|s| s.is_video())
    }

    pub fn audio_stream_count(&self) -> usize {
        self.streams.iter().filter(|s| s.is_audio()).count()
    }
}

/// Abstraction over the external media inspection tool.
///
/// Implementations must be shareable across the worker thread and the rayon
/// pool used by parallel scans.
pub trait MediaInspector: Send + Sync {
    /// Inspects a media file and returns its report.
    fn inspect(&self, path: &Path) -> CoreResult<ProbeReport>;

    /// Verifies that the inspector can run at all. Defaults to always available.
    fn check_available(&self) -> CoreResult<()> {
        Ok(())
    }
}

/// [`MediaInspector`] that shells out to the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeInspector {
    program: String,
}

impl Default for FfprobeInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeInspector {
    pub fn new() -> Self {
        Self::with_program("ffprobe")
    }

    /// Uses a specific ffprobe binary instead of the one on `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"]);
        cmd.arg(path);
        cmd
    }
}

impl MediaInspector for FfprobeInspector {
    fn inspect(&self, path: &Path) -> CoreResult<ProbeReport> {
        log::debug!("Running ffprobe on: {}", path.display());

        let output = self.command(path).output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CoreError::DependencyNotFound(self.program.clone())
            } else {
                command_start_error(&self.program, e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::warn!("ffprobe failed for {}: {}", path.display(), stderr);
            return Err(command_failed_error(&self.program, output.status, stderr));
        }

        ProbeReport::from_json(&output.stdout)
    }

    fn check_available(&self) -> CoreResult<()> {
        super::check_dependency(&self.program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "width": 1920,
                "height": 1080,
                "r_frame_rate": "30000/1001",
                "nb_frames": "1798",
                "color_transfer": "bt709",
                "tags": { "language": "und", "timecode": "01:00:00;00" }
            },
            { "index": 1, "codec_name": "aac", "codec_type": "audio", "channels": 2 },
            { "index": 2, "codec_name": "aac", "codec_type": "audio", "channels": 2 }
        ],
        "format": {
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "60.026",
            "tags": { "major_brand": "qt  " }
        }
    }"#;

    #[test]
    fn test_report_parsing() {
        let report = ProbeReport::from_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(report.streams.len(), 3);
        assert_eq!(report.audio_stream_count(), 2);

        let video = report.video_stream().unwrap();
        assert_eq!(video.codec_name.as_deref(), Some("h264"));
        assert_eq!(video.r_frame_rate.as_deref(), Some("30000/1001"));
        assert_eq!(video.tags.get("timecode").and_then(Value::as_str), Some("01:00:00;00"));
        assert_eq!(report.format.unwrap().duration.as_deref(), Some("60.026"));
    }

    #[test]
    fn test_malformed_output_is_json_error() {
        let result = ProbeReport::from_json(b"not json");
        assert!(matches!(result, Err(CoreError::JsonParseError(_))));
    }

    #[test]
    fn test_missing_program_maps_to_dependency_error() {
        let inspector = FfprobeInspector::with_program("cutlist-missing-ffprobe-91c2");
        let result = inspector.inspect(Path::new("clip.mov"));
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
        assert!(inspector.check_available().is_err());
    }
}
