// cutlist-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and for consumers that enable the "test-mocks" feature.

use super::{MediaInspector, ProbeFormat, ProbeReport, ProbeStream};
use crate::error::{CoreError, CoreResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum MockOutcome {
    Report(ProbeReport),
    Failure(String),
}

/// Mock [`MediaInspector`] returning canned reports keyed by file name.
///
/// Clones share state, so a test can keep a handle after moving the mock into
/// a session and still inspect the received calls.
#[derive(Clone, Default)]
pub struct MockMediaInspector {
    outcomes: Arc<Mutex<HashMap<String, MockOutcome>>>,
    received_calls: Arc<Mutex<Vec<PathBuf>>>,
    unavailable: Arc<Mutex<bool>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockMediaInspector {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `report` whenever a file with this name is inspected.
    pub fn add_report(&self, file_name: &str, report: ProbeReport) {
        lock(&self.outcomes).insert(file_name.to_string(), MockOutcome::Report(report));
    }

    /// Fails inspection of this file name with `message`.
    pub fn add_failure(&self, file_name: &str, message: &str) {
        lock(&self.outcomes)
            .insert(file_name.to_string(), MockOutcome::Failure(message.to_string()));
    }

    /// Makes `check_available` report the tool as missing.
    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    pub fn get_received_calls(&self) -> Vec<PathBuf> {
        lock(&self.received_calls).clone()
    }
}

impl MediaInspector for MockMediaInspector {
    fn inspect(&self, path: &Path) -> CoreResult<ProbeReport> {
        lock(&self.received_calls).push(path.to_path_buf());

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match lock(&self.outcomes).get(&file_name) {
            Some(MockOutcome::Report(report)) => {
                log::info!("MockMediaInspector: returning report for '{}'", file_name);
                Ok(report.clone())
            }
            Some(MockOutcome::Failure(message)) => Err(CoreError::OperationFailed(message.clone())),
            None => Err(CoreError::OperationFailed(format!(
                "MockMediaInspector: no report registered for '{file_name}'"
            ))),
        }
    }

    fn check_available(&self) -> CoreResult<()> {
        if *lock(&self.unavailable) {
            Err(CoreError::DependencyNotFound("ffprobe".to_string()))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// REPORT FIXTURES
// ============================================================================

/// A report with one video stream and `audio_tracks` audio streams.
///
/// `frame_rate` is the raw `r_frame_rate` string, e.g. `"25/1"`.
pub fn video_report(
    codec: &str,
    width: i64,
    height: i64,
    frame_rate: &str,
    nb_frames: u64,
    audio_tracks: usize,
) -> ProbeReport {
    let mut streams = vec![ProbeStream {
        codec_type: Some("video".to_string()),
        codec_name: Some(codec.to_string()),
        width: Some(width),
        height: Some(height),
        r_frame_rate: Some(frame_rate.to_string()),
        nb_frames: Some(nb_frames.to_string()),
        ..ProbeStream::default()
    }];
    streams.extend((0..audio_tracks).map(|_| audio_stream()));

    ProbeReport {
        streams,
        format: Some(ProbeFormat::default()),
    }
}

/// A report with audio streams only, like a WAV or an audio-only MOV.
pub fn audio_only_report(audio_tracks: usize) -> ProbeReport {
    ProbeReport {
        streams: (0..audio_tracks).map(|_| audio_stream()).collect(),
        format: Some(ProbeFormat::default()),
    }
}

/// Adds a stream-level tag to the first video stream of `report`.
pub fn with_video_tag(mut report: ProbeReport, key: &str, value: &str) -> ProbeReport {
    if let Some(stream) = report.streams.iter_mut().find(|s| s.is_video()) {
        stream.tags.insert(key.to_string(), Value::String(value.to_string()));
    }
    report
}

/// Adds a container-level tag to `report`.
pub fn with_format_tag(mut report: ProbeReport, key: &str, value: &str) -> ProbeReport {
    let format = report.format.get_or_insert_with(ProbeFormat::default);
    format.tags.insert(key.to_string(), Value::String(value.to_string()));
    report
}

fn audio_stream() -> ProbeStream {
    ProbeStream {
        codec_type: Some("audio".to_string()),
        codec_name: Some("pcm_s16le".to_string()),
        tags: Map::new(),
        ..ProbeStream::default()
    }
}
