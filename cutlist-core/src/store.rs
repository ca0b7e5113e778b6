// ============================================================================
// cutlist-core/src/store.rs
// ============================================================================
//
// SHOT LIST STORE: Reading and Rewriting the Canonical CSV
//
// The shot list is read at the start of a scan and rewritten at its end with
// a fixed set of columns. Reading is forgiving: it accepts exported
// spreadsheets whose headers only resemble "filename" and "time in - time
// out", and falls back to the first two columns when no header matches.
// Writing goes through a temp file in the same folder so a failed write
// leaves the previous store in place.
//
// AI-ASSISTANT-INFO: CSV shot list reading, writing and full reload

// ---- External crate imports ----
use serde::Serialize;
use tempfile::NamedTempFile;

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::media::ColorProfile;
use crate::timecode::FrameRate;
use crate::validation::{RowRecord, RowStatus, RowType, ShotEntry};

// ---- Standard library imports ----
use std::fs;
use std::io::Write;
use std::path::Path;

/// Column order of the canonical store.
pub const STORE_HEADERS: [&str; 8] = [
    "filename",
    "range",
    "type",
    "codec",
    "framerate",
    "color_profile",
    "duration_frames",
    "status",
];

const UTF8_BOM: &str = "\u{feff}";
const FILENAME_KEYWORDS: [&str; 3] = ["file", "tên", "tệp"];
const RANGE_KEYWORDS: [&str; 4] = ["time", "inout", "thờigian", "range"];

// ============================================================================
// READING
// ============================================================================

/// Column positions found in a header row.
#[derive(Debug, Default)]
struct ColumnMap {
    filename: usize,
    range: usize,
    row_type: Option<usize>,
    codec: Option<usize>,
    framerate: Option<usize>,
    color_profile: Option<usize>,
    duration_frames: Option<usize>,
    status: Option<usize>,
}

#[derive(Debug)]
struct Table {
    columns: ColumnMap,
    /// Header cell of the filename column, when a header was recognized
    filename_header: Option<String>,
    rows: Vec<Vec<String>>,
}

fn normalize_header(cell: &str) -> String {
    cell.to_lowercase().trim().replace([' ', '-'], "")
}

fn clean_cell(cell: &str) -> String {
    cell.replace(['\r', '\n'], " ").trim().to_string()
}

fn map_header(header: &[String]) -> Option<ColumnMap> {
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    let find_keyword = |keywords: &[&str]| {
        normalized
            .iter()
            .position(|h| keywords.iter().any(|keyword| h.contains(keyword)))
    };
    let find_exact = |name: &str| normalized.iter().position(|h| h == &normalize_header(name));

    Some(ColumnMap {
        filename: find_keyword(&FILENAME_KEYWORDS)?,
        range: find_keyword(&RANGE_KEYWORDS)?,
        row_type: find_exact("type"),
        codec: find_exact("codec"),
        framerate: find_exact("framerate"),
        color_profile: find_exact("color_profile"),
        duration_frames: find_exact("duration_frames"),
        status: find_exact("status"),
    })
}

fn read_table(path: &Path) -> CoreResult<Table> {
    let raw = fs::read_to_string(path)?;
    let content = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(clean_cell).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        records.push(cells);
    }

    let header_map = records.first().and_then(|header| map_header(header));
    match header_map {
        Some(columns) => {
            let filename_header = records.first().and_then(|h| h.get(columns.filename).cloned());
            log::debug!("Recognized shot list header in {}", path.display());
            Ok(Table {
                columns,
                filename_header,
                rows: records.into_iter().skip(1).collect(),
            })
        }
        None => {
            log::info!(
                "No recognizable header in {}, reading the first two columns",
                path.display()
            );
            let rows = records
                .into_iter()
                .filter(|row| row.len() >= 2 && row[0] != "filename")
                .collect();
            Ok(Table {
                columns: ColumnMap {
                    filename: 0,
                    range: 1,
                    ..ColumnMap::default()
                },
                filename_header: None,
                rows,
            })
        }
    }
}

impl Table {
    fn cell<'a>(row: &'a [String], index: Option<usize>) -> &'a str {
        index.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
    }

    /// Rows that are not a repeated header line.
    fn data_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.rows.iter().filter(move |row| match &self.filename_header {
            Some(header) => Self::cell(row, Some(self.columns.filename)) != header,
            None => true,
        })
    }

    fn stored_status(&self, row: &[String]) -> Option<RowStatus> {
        self.columns
            .status
            .and_then(|_| RowStatus::from_label(Self::cell(row, self.columns.status)))
    }
}

/// Reads the shot entries of a shot list, in order.
///
/// A stored `gap` status becomes a gap override on the entry.
///
/// # Arguments
///
/// * `path` - The shot list CSV
///
/// # Returns
///
/// * `Ok(Vec<ShotEntry>)` - The entries; may be empty
/// * `Err(CoreError)` - The file could not be read or parsed
pub fn read_entries(path: &Path) -> CoreResult<Vec<ShotEntry>> {
    let table = read_table(path)?;
    let entries: Vec<ShotEntry> = table
        .data_rows()
        .map(|row| ShotEntry {
            filename: Table::cell(row, Some(table.columns.filename)).to_string(),
            range: Table::cell(row, Some(table.columns.range)).to_string(),
            gap_override: table.stored_status(row) == Some(RowStatus::Gap),
        })
        .collect();
    log::info!("Read {} rows from {}", entries.len(), path.display());
    Ok(entries)
}

/// Rebuilds row records from a previously written store without probing.
///
/// Fields the store does not keep (resolved path, start timecode, audio
/// track count, frame size) come back with their defaults.
pub fn read_records(path: &Path) -> CoreResult<Vec<RowRecord>> {
    let table = read_table(path)?;
    let columns = &table.columns;

    let records = table
        .data_rows()
        .map(|row| {
            let filename = Table::cell(row, Some(columns.filename)).to_string();
            let status = table.stored_status(row).unwrap_or_else(|| {
                if !filename.is_empty() {
                    log::warn!(
                        "Row '{}' has no recognizable status, treating as skipped",
                        filename
                    );
                }
                RowStatus::Skipped
            });
            RowRecord {
                range: Table::cell(row, Some(columns.range)).to_string(),
                row_type: RowType::from_label(Table::cell(row, columns.row_type)),
                status,
                codec: Table::cell(row, columns.codec).to_string(),
                frame_rate: Table::cell(row, columns.framerate).parse::<FrameRate>().ok(),
                color_profile: ColorProfile::from_label(Table::cell(row, columns.color_profile)),
                frame_count: Table::cell(row, columns.duration_frames).parse().unwrap_or(0),
                filename,
                ..RowRecord::default()
            }
        })
        .collect();
    Ok(records)
}

// ============================================================================
// WRITING
// ============================================================================

#[derive(Serialize)]
struct StoreRow<'a> {
    filename: &'a str,
    range: &'a str,
    #[serde(rename = "type")]
    row_type: &'a str,
    codec: &'a str,
    framerate: String,
    color_profile: String,
    duration_frames: String,
    status: String,
}

impl<'a> From<&'a RowRecord> for StoreRow<'a> {
    fn from(row: &'a RowRecord) -> Self {
        Self {
            filename: &row.filename,
            range: &row.range,
            row_type: row.row_type.map(RowType::as_str).unwrap_or(""),
            codec: &row.codec,
            framerate: row.frame_rate.map(|rate| rate.to_string()).unwrap_or_default(),
            color_profile: row.color_profile.to_string(),
            duration_frames: if row.frame_rate.is_some() {
                row.frame_count.to_string()
            } else {
                String::new()
            },
            status: row.status.label(),
        }
    }
}

/// Rewrites the store with the canonical columns.
///
/// The data goes to a temp file beside `path` first and is renamed into
/// place, so the old store survives any failure.
pub fn write_records(path: &Path, rows: &[RowRecord]) -> CoreResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(UTF8_BOM.as_bytes())?;
    {
        let mut writer = csv::Writer::from_writer(temp.as_file_mut());
        if rows.is_empty() {
            writer.write_record(STORE_HEADERS)?;
        }
        for row in rows {
            writer.serialize(StoreRow::from(row))?;
        }
        writer.flush()?;
    }

    temp.persist(path)
        .map_err(|e| CoreError::Io(e.error))?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
