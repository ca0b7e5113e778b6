// ============================================================================
// cutlist-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Preview table, error list and summaries
//
// Everything the commands print to stdout goes through here. Layout helpers
// return strings so the table can be tested without a terminal; the print_*
// functions add color when the terminal supports it.
//
// AI-ASSISTANT-INFO: Preview table, summaries and JSON output for the CLI

// ---- External crate imports ----
use cutlist_core::{BulkGapReport, GenerateReport, RowRecord, RowStatus, ScanSummary};
use owo_colors::OwoColorize;
use serde_json::json;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ---- Standard library imports ----
use std::path::Path;

// ============================================================================
// STYLING CONSTANTS
// ============================================================================

pub const SUCCESS_SYMBOL: &str = "✓";
pub const ERROR_SYMBOL: &str = "✗";

const FILENAME_WIDTH: usize = 26;
const RANGE_WIDTH: usize = 27;
const CODEC_WIDTH: usize = 8;
const FPS_WIDTH: usize = 7;
const COLOR_WIDTH: usize = 9;
const DURATION_WIDTH: usize = 8;
const ELLIPSIS: &str = "...";

/// Check if color should be used (respects NO_COLOR and non-terminal output)
fn should_use_color() -> bool {
    std::env::var("NO_COLOR").is_err() && console::colors_enabled()
}

// ============================================================================
// LAYOUT HELPERS
// ============================================================================

/// Cuts `text` to at most `max` display columns, ending in `...` when cut.
pub fn truncate_display(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(ELLIPSIS.len());
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Pads `text` with spaces to `width` display columns.
pub fn pad_display(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(pad))
}

/// How a status is highlighted in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Good,
    Error,
    /// A range problem the user can fix by editing the row
    Correctable,
    Neutral,
}

pub fn status_tone(status: &RowStatus) -> StatusTone {
    match status {
        RowStatus::Ok => StatusTone::Good,
        RowStatus::Gap | RowStatus::Skipped => StatusTone::Neutral,
        RowStatus::TimeFormatError | RowStatus::OutBeforeIn => StatusTone::Correctable,
        _ => StatusTone::Error,
    }
}

fn paint(text: &str, tone: StatusTone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        StatusTone::Good => text.green().to_string(),
        StatusTone::Error => text.red().to_string(),
        StatusTone::Correctable => text.truecolor(255, 165, 0).to_string(),
        StatusTone::Neutral => text.yellow().to_string(),
    }
}

fn table_header() -> String {
    [
        pad_display("#", 4),
        pad_display("File name", FILENAME_WIDTH),
        pad_display("Range", RANGE_WIDTH),
        pad_display("Codec", CODEC_WIDTH),
        pad_display("FPS", FPS_WIDTH),
        pad_display("Color", COLOR_WIDTH),
        pad_display("Frames", DURATION_WIDTH),
        "Status".to_string(),
    ]
    .join(" ")
}

/// One table line for the row at `position` (shown 1-based).
pub fn format_row(position: usize, row: &RowRecord, color: bool) -> String {
    let fps = row
        .frame_rate
        .map(|rate| rate.to_string())
        .unwrap_or_else(|| "-".to_string());
    let frames = if row.frame_count > 0 {
        row.frame_count.to_string()
    } else {
        "-".to_string()
    };
    let cells = [
        pad_display(&(position + 1).to_string(), 4),
        pad_display(&truncate_display(row.filename.trim(), FILENAME_WIDTH), FILENAME_WIDTH),
        pad_display(&truncate_display(row.range.trim(), RANGE_WIDTH), RANGE_WIDTH),
        pad_display(&truncate_display(&row.codec, CODEC_WIDTH), CODEC_WIDTH),
        pad_display(&fps, FPS_WIDTH),
        pad_display(
            &truncate_display(&row.color_profile.to_string(), COLOR_WIDTH),
            COLOR_WIDTH,
        ),
        pad_display(&frames, DURATION_WIDTH),
    ];
    let status = paint(&row.status.label(), status_tone(&row.status), color);
    format!("{} {}", cells.join(" "), status)
}

/// The full preview table, header first.
pub fn format_table(rows: &[RowRecord], color: bool) -> Vec<String> {
    let header = table_header();
    let rule = "-".repeat(header.width());
    let mut lines = vec![header, rule];
    lines.extend(rows.iter().enumerate().map(|(i, row)| format_row(i, row, color)));
    lines
}

// ============================================================================
// TERMINAL COMPONENTS
// ============================================================================

/// Print a section header
pub fn print_section(title: &str) {
    println!();
    if should_use_color() {
        println!("===== {} =====", title.to_uppercase().cyan().bold());
    } else {
        println!("===== {} =====", title.to_uppercase());
    }
    println!();
}

/// Print a status line with the label padded to a fixed width
pub fn print_status(label: &str, value: &str) {
    let label_width = 15;
    let padding = if label.len() < label_width {
        label_width - label.len()
    } else {
        1
    };
    println!("  {}:{} {}", label, " ".repeat(padding), value);
}

pub fn print_success(message: &str) {
    if should_use_color() {
        println!("  {} {}", SUCCESS_SYMBOL.green().bold(), message);
    } else {
        println!("  {} {}", SUCCESS_SYMBOL, message);
    }
}

pub fn print_failure(message: &str) {
    if should_use_color() {
        println!("  {} {}", ERROR_SYMBOL.red().bold(), message);
    } else {
        println!("  {} {}", ERROR_SYMBOL, message);
    }
}

pub fn print_preview(rows: &[RowRecord]) {
    print_section("Shot list");
    for line in format_table(rows, should_use_color()) {
        println!("{}", line);
    }
}

pub fn print_scan_summary(summary: &ScanSummary, most_common_fps: Option<String>) {
    print_section("Scan summary");
    print_status("Rows", &summary.total.to_string());
    print_status("Ready", &summary.ok.to_string());
    print_status("Need attention", &summary.errors.to_string());
    if let Some(fps) = most_common_fps {
        print_status("Common FPS", &fps);
    }
}

/// Lists rows that still need attention, numbered as in the table.
pub fn print_error_list(errors: &[(usize, RowRecord)]) {
    if errors.is_empty() {
        print_success("Every row is ready for the timeline");
        return;
    }
    print_section("Rows needing attention");
    let color = should_use_color();
    for (index, row) in errors {
        let label = paint(&row.status.label(), status_tone(&row.status), color);
        println!("  {:>4}  {}  {}  {}", index + 1, row.display_name(), row.range.trim(), label);
    }
    println!();
    println!("  Fix a row with `cutlist fix --row <N> ...`, or re-run scan with --gap-errors.");
}

pub fn print_bulk_report(report: &BulkGapReport) {
    print_success(&format!("Converted {} rows to gaps", report.converted.len()));
    for (index, reason) in &report.rejected {
        print_failure(&format!("Row {} kept: {}", index + 1, reason));
    }
}

/// Placed clips, duration and every dropped row with its reason.
pub fn print_compile_summary(report: &GenerateReport) {
    print_section("Timeline");
    let compile = &report.compile;
    print_status("Clips", &compile.clips.to_string());
    print_status("Gaps", &compile.gaps.to_string());
    print_status("Duration", &format!("{} frames", compile.sequence.duration));
    print_status("Timeline FPS", &report.timeline_fps.to_string());
    print_status("Output", &report.output_path.display().to_string());

    for dropped in &compile.dropped {
        print_failure(&format!(
            "Row {} ({}) left out: {}",
            dropped.index + 1,
            dropped.filename,
            dropped.reason
        ));
    }
    print_success("Timeline written");
}

pub fn print_row_saved(position: usize, row: &RowRecord, store: &Path) {
    println!("{}", format_row(position, row, should_use_color()));
    print_success(&format!("Saved to {}", store.display()));
}

// ============================================================================
// JSON OUTPUT
// ============================================================================

/// The JSON form of a row as printed by `scan --json`.
pub fn row_to_json(position: usize, row: &RowRecord) -> serde_json::Value {
    json!({
        "type": "row",
        "row": position + 1,
        "filename": row.filename,
        "range": row.range,
        "row_type": row.row_type.map(|t| t.as_str()),
        "codec": row.codec,
        "framerate": row.frame_rate.map(|rate| rate.to_string()),
        "color_profile": row.color_profile.to_string(),
        "duration_frames": row.frame_count,
        "status": row.status.kind(),
        "status_label": row.status.label(),
    })
}

pub fn compile_to_json(report: &GenerateReport) -> serde_json::Value {
    let dropped: Vec<_> = report
        .compile
        .dropped
        .iter()
        .map(|d| json!({ "row": d.index + 1, "filename": d.filename, "reason": d.reason }))
        .collect();
    json!({
        "type": "timeline",
        "clips": report.compile.clips,
        "gaps": report.compile.gaps,
        "duration_frames": report.compile.sequence.duration,
        "timeline_fps": report.timeline_fps.to_string(),
        "output_path": report.output_path.display().to_string(),
        "dropped": dropped,
    })
}

pub fn print_json(value: &serde_json::Value) {
    println!("{}", value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_core::{ColorProfile, FrameRate, RowType};

    #[test]
    fn test_truncate_display_counts_columns() {
        assert_eq!(truncate_display("short.mov", 26), "short.mov");
        let long = "a_really_long_interview_take_07.mov";
        let cut = truncate_display(long, 26);
        assert_eq!(cut.width(), 26);
        assert!(cut.ends_with("..."));

        // wide characters take two columns each
        let wide = truncate_display("影片影片影片影片影片影片影片.mov", 10);
        assert_eq!(wide, "影片影...");
        assert!(wide.width() <= 10);
    }

    #[test]
    fn test_status_tones() {
        assert_eq!(status_tone(&RowStatus::Ok), StatusTone::Good);
        assert_eq!(status_tone(&RowStatus::OutBeforeIn), StatusTone::Correctable);
        assert_eq!(status_tone(&RowStatus::TimeFormatError), StatusTone::Correctable);
        assert_eq!(status_tone(&RowStatus::FileNotFound), StatusTone::Error);
        assert_eq!(status_tone(&RowStatus::ProbeError("x".into())), StatusTone::Error);
        assert_eq!(status_tone(&RowStatus::Gap), StatusTone::Neutral);
        assert_eq!(status_tone(&RowStatus::Skipped), StatusTone::Neutral);
    }

    #[test]
    fn test_table_row_layout() {
        let row = RowRecord {
            filename: "interview_with_a_very_long_name.mov".to_string(),
            range: "00:00:10:00 - 00:00:14:00".to_string(),
            row_type: Some(RowType::Clip),
            status: RowStatus::Ok,
            codec: "prores".to_string(),
            color_profile: ColorProfile::Raw("arib-std-b67".to_string()),
            frame_rate: FrameRate::new(25, 1),
            frame_count: 2000,
            ..RowRecord::default()
        };
        let table = format_table(&[row.clone()], false);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].width(), table[1].width());

        let line = &table[2];
        assert!(line.starts_with("1    interview_with_a_very_l..."));
        assert!(line.contains("arib-s..."));
        assert!(line.contains("25.000"));
        assert!(line.ends_with(" ok"));

        let value = row_to_json(0, &row);
        assert_eq!(value["row"], 1);
        assert_eq!(value["status"], "ok");
        assert_eq!(value["duration_frames"], 2000);
    }
}
