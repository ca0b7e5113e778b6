//! Timeline document model.
//!
//! The compiler builds a [`Sequence`] in memory; the [`xml`] module renders
//! it as an xmeml interchange document. All times are integer frame numbers:
//! `start`/`end` on the timeline's own rate, `in`/`out` on the source's.

pub mod compiler;
pub mod xml;

pub use compiler::{CompileReport, DroppedRow, TimelineCompiler};
pub use xml::{file_url, render_sequence, write_sequence};

/// Number of audio tracks every sequence carries.
pub const AUDIO_TRACK_COUNT: usize = 8;

/// Kind of media a clip entry or link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

/// Media description the editor uses to relink a clip.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub pathurl: String,
    /// Source length in source frames
    pub duration: u64,
    /// Rounded source frame rate
    pub timebase: u32,
    pub ntsc: bool,
    pub timecode: String,
    /// Start timecode as a source frame offset
    pub timecode_frame: i64,
    pub width: u32,
    pub height: u32,
    pub channel_count: usize,
}

/// How a clip entry refers to its media.
#[derive(Debug, Clone, PartialEq)]
pub enum FileRef {
    /// The full node, carried by the video entry of a group
    Node(FileNode),
    /// A reference by id, used by audio entries
    Id(String),
}

impl FileRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Node(node) => &node.id,
            Self::Id(id) => id,
        }
    }
}

/// One cross-reference from a clip entry to a member of its placement group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub clip_ref: String,
    pub media: MediaKind,
    pub track_index: usize,
    pub clip_index: usize,
    /// Present on links to other members, absent on the self link
    pub group_index: Option<u32>,
}

/// A clip entry on one track.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipItem {
    pub id: String,
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub in_frame: i64,
    pub out_frame: i64,
    pub file: FileRef,
    /// Source audio track, for audio entries
    pub source_track: Option<usize>,
    pub links: Vec<Link>,
}

/// The compiled sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    pub timebase: u32,
    pub width: u32,
    pub height: u32,
    pub video_track: Vec<ClipItem>,
    /// Always [`AUDIO_TRACK_COUNT`] tracks, some possibly empty
    pub audio_tracks: Vec<Vec<ClipItem>>,
    /// Final cursor position in timeline frames
    pub duration: i64,
}

impl Sequence {
    pub fn new(name: impl Into<String>, timebase: u32, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            timebase,
            width,
            height,
            video_track: Vec::new(),
            audio_tracks: vec![Vec::new(); AUDIO_TRACK_COUNT],
            duration: 0,
        }
    }

    /// Every clip entry, video first, then each audio track in order.
    pub fn clips(&self) -> impl Iterator<Item = &ClipItem> {
        self.video_track.iter().chain(self.audio_tracks.iter().flatten())
    }
}
