//! JSON event handler for structured progress output
//!
//! Writes one JSON object per event, for scripts that drive the CLI.

use super::{Event, EventHandler};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that outputs events as JSON lines
pub struct JsonProgressHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonProgressHandler {
    /// Create a new JSON progress handler that writes to stdout
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a new JSON progress handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_json(&self, value: serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{}", json_str);
                let _ = output.flush();
            }
        }
    }

    /// The JSON form of an event, without timestamp.
    pub fn to_json(event: &Event) -> serde_json::Value {
        match event {
            Event::ScanStarted { total } => json!({ "type": "scan_started", "total": total }),
            Event::RowValidated {
                index,
                total,
                percent,
                filename,
                status,
            } => json!({
                "type": "row_validated",
                "index": index,
                "total": total,
                "percent": percent,
                "filename": filename,
                "status": status
            }),
            Event::ScanComplete {
                total,
                ok,
                errors,
                most_common_fps,
            } => json!({
                "type": "scan_complete",
                "total": total,
                "ok": ok,
                "errors": errors,
                "most_common_fps": most_common_fps
            }),
            Event::CompileStarted { rows, timeline_fps } => json!({
                "type": "compile_started",
                "rows": rows,
                "timeline_fps": timeline_fps
            }),
            Event::RowDropped { index, filename, reason } => json!({
                "type": "row_dropped",
                "index": index,
                "filename": filename,
                "reason": reason
            }),
            Event::CompileComplete {
                clips,
                duration_frames,
                output_path,
            } => json!({
                "type": "compile_complete",
                "clips": clips,
                "duration_frames": duration_frames,
                "output_path": output_path
            }),
            Event::CopyProgress { copied, total } => json!({
                "type": "copy_progress",
                "copied": copied,
                "total": total
            }),
            Event::CopyComplete { destination } => json!({
                "type": "copy_complete",
                "destination": destination.display().to_string()
            }),
            Event::Warning { message } => json!({ "type": "warning", "message": message }),
            Event::Error { title, message } => json!({
                "type": "error",
                "title": title,
                "message": message
            }),
        }
    }
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        let mut value = Self::to_json(event);
        if let Some(object) = value.as_object_mut() {
            object.insert("timestamp".to_string(), json!(Self::get_timestamp()));
        }
        self.write_json(value);
    }
}
