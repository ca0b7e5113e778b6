// ============================================================================
// cutlist-core/src/timeline/compiler.rs
// ============================================================================
//
// TIMELINE COMPILER: Validated Rows to a Placed, Linked Sequence
//
// A single forward pass over the rows with one running cursor shared by the
// video track and all audio tracks:
//
// - gap rows advance the cursor by their length at the timeline rate
// - rows that are not ok clips contribute nothing
// - ok clips are clamped into their media, converted to the timeline rate,
//   placed at the cursor on video plus one audio track per source track
//   (at most eight), cross-linked, and the cursor moves on
//
// A clip that cannot be placed is dropped and reported; it never fails the
// compile. Conversion rounds per clip, so long runs at a non-integer rate
// ratio can drift by a frame or so.
//
// AI-ASSISTANT-INFO: Timeline assembly with cursor placement and cross-linking

// ---- Internal crate imports ----
use super::{AUDIO_TRACK_COUNT, ClipItem, FileNode, FileRef, Link, MediaKind, Sequence, file_url};
use crate::config::Resolution;
use crate::events::{Event, EventDispatcher};
use crate::timecode::{self, FrameRate};
use crate::validation::RowRecord;

/// Group identifier carried by links between different members of a group.
const LINK_GROUP_INDEX: u32 = 1;

/// A row excluded from the timeline during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub index: usize,
    pub filename: String,
    pub reason: String,
}

/// Result of a compile.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileReport {
    pub sequence: Sequence,
    /// Number of placed clips (placement groups)
    pub clips: usize,
    pub gaps: usize,
    pub dropped: Vec<DroppedRow>,
}

/// Source-side numbers of a clip that survived clamping and conversion.
struct Placement {
    in_frame: i64,
    out_frame: i64,
    timeline_frames: i64,
    file: FileNode,
}

/// Compiles row records into a [`Sequence`].
pub struct TimelineCompiler {
    timeline_fps: FrameRate,
    resolution: Resolution,
    sequence_name: String,
}

impl TimelineCompiler {
    pub fn new(
        timeline_fps: FrameRate,
        resolution: Resolution,
        sequence_name: impl Into<String>,
    ) -> Self {
        Self {
            timeline_fps,
            resolution,
            sequence_name: sequence_name.into(),
        }
    }

    /// Runs the compile pass.
    ///
    /// # Arguments
    ///
    /// * `rows` - Validated rows in timeline order
    /// * `events` - Receives a `RowDropped` event per excluded clip
    ///
    /// # Returns
    ///
    /// * The compiled sequence and a summary of what was placed and dropped
    pub fn compile(&self, rows: &[RowRecord], events: &EventDispatcher) -> CompileReport {
        let timeline_fps = self.timeline_fps.rounded().as_f64();
        let mut sequence = Sequence::new(
            self.sequence_name.clone(),
            self.timeline_fps.timebase(),
            self.resolution.width,
            self.resolution.height,
        );

        let mut cursor: i64 = 0;
        let mut clip_count = 0;
        let mut gaps = 0;
        let mut dropped = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            if row.is_gap() {
                match timecode::parse_range(&row.range, timeline_fps) {
                    Ok((in_frame, out_frame)) if out_frame > in_frame => {
                        log::debug!("Gap at row {}: {} frames", index + 1, out_frame - in_frame);
                        cursor += out_frame - in_frame;
                        gaps += 1;
                    }
                    Ok(_) => log::warn!("Gap at row {} has no positive length, skipped", index + 1),
                    Err(e) => log::warn!("Gap at row {} skipped: {}", index + 1, e),
                }
                continue;
            }

            if !row.is_ok_clip() {
                continue;
            }

            let clip_index = clip_count + 1;
            let placement = match self.place(row, clip_index) {
                Ok(placement) => placement,
                Err(reason) => {
                    log::warn!("Dropping row {} ('{}'): {}", index + 1, row.filename, reason);
                    events.emit(Event::RowDropped {
                        index,
                        filename: row.filename.clone(),
                        reason: reason.clone(),
                    });
                    dropped.push(DroppedRow {
                        index,
                        filename: row.filename.clone(),
                        reason,
                    });
                    continue;
                }
            };

            clip_count = clip_index;
            cursor = Self::emit_group(&mut sequence, row, placement, clip_index, cursor);
        }

        sequence.duration = cursor;
        log::info!(
            "Compiled {} clips and {} gaps into {} frames ({} dropped)",
            clip_count,
            gaps,
            cursor,
            dropped.len()
        );

        CompileReport {
            sequence,
            clips: clip_count,
            gaps,
            dropped,
        }
    }

    /// Clamps, converts and describes one ok clip.
    fn place(&self, row: &RowRecord, clip_index: usize) -> Result<Placement, String> {
        let source_rate = row.frame_rate.ok_or("no source frame rate")?;
        let path = row.full_path.as_deref().ok_or("no resolved media path")?;
        let source_fps = source_rate.rounded().as_f64();

        let (in_raw, out_raw) =
            timecode::parse_range(&row.range, source_fps).map_err(|e| e.to_string())?;
        let start_offset =
            timecode::frames(&row.start_timecode, source_fps).map_err(|e| e.to_string())?;
        let frame_count = i64::try_from(row.frame_count).unwrap_or(i64::MAX);

        let in_frame = (in_raw - start_offset).max(0);
        let out_frame = (out_raw - start_offset).min(frame_count);
        if in_frame >= out_frame {
            return Err(format!(
                "range {}-{} is empty inside the media ({} frames, start offset {})",
                in_raw, out_raw, frame_count, start_offset
            ));
        }

        let source_frames = out_frame - in_frame;
        let ratio = self.timeline_fps.rounded().as_f64() / source_fps;
        let timeline_frames = (source_frames as f64 * ratio).round_ties_even() as i64;
        if timeline_frames <= 0 {
            return Err(format!("{source_frames} source frames convert to no timeline frames"));
        }

        let pathurl = file_url(path).map_err(|e| e.to_string())?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| row.filename.clone());

        Ok(Placement {
            in_frame,
            out_frame,
            timeline_frames,
            file: FileNode {
                id: format!("file_{clip_index}"),
                name,
                pathurl,
                duration: row.frame_count,
                timebase: source_rate.timebase(),
                ntsc: source_rate.is_ntsc(),
                timecode: row.start_timecode.clone(),
                timecode_frame: start_offset,
                width: row.width,
                height: row.height,
                channel_count: if row.audio_tracks > 0 { row.audio_tracks } else { 2 },
            },
        })
    }

    /// Emits the video entry, its audio siblings and their links.
    /// Returns the cursor after the group.
    fn emit_group(
        sequence: &mut Sequence,
        row: &RowRecord,
        placement: Placement,
        clip_index: usize,
        start: i64,
    ) -> i64 {
        let end = start + placement.timeline_frames;
        let name = row.filename.trim().to_string();
        let file_id = placement.file.id.clone();
        let audio_count = row.audio_tracks.min(AUDIO_TRACK_COUNT);

        // (id, kind, track index) of every member, video first
        let members: Vec<(String, MediaKind, usize)> = std::iter::once((
            format!("vid_clip_{clip_index}"),
            MediaKind::Video,
            1,
        ))
        .chain((1..=audio_count).map(|track| {
            (format!("aud_clip_{clip_index}_{track}"), MediaKind::Audio, track)
        }))
        .collect();

        let links_from = |source_id: &str| -> Vec<Link> {
            members
                .iter()
                .map(|(target_id, media, track_index)| Link {
                    clip_ref: target_id.clone(),
                    media: *media,
                    track_index: *track_index,
                    clip_index,
                    group_index: (target_id != source_id).then_some(LINK_GROUP_INDEX),
                })
                .collect()
        };

        let mut file = Some(placement.file);
        for (id, media, track_index) in &members {
            let clip = ClipItem {
                id: id.clone(),
                name: name.clone(),
                start,
                end,
                in_frame: placement.in_frame,
                out_frame: placement.out_frame,
                file: match (media, file.take()) {
                    (MediaKind::Video, Some(node)) => FileRef::Node(node),
                    _ => FileRef::Id(file_id.clone()),
                },
                source_track: (*media == MediaKind::Audio).then_some(*track_index),
                links: links_from(id),
            };
            match media {
                MediaKind::Video => sequence.video_track.push(clip),
                MediaKind::Audio => sequence.audio_tracks[track_index - 1].push(clip),
            }
        }

        end
    }
}
