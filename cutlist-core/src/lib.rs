//! Core library that compiles a shot list and a folder of source videos into
//! an editing timeline.
//!
//! A shot list is a CSV of `filename` and `"<in> - <out>"` rows. Each row is
//! resolved against the video folder (preferring `_Proxy.mp4` stand-ins),
//! probed with ffprobe and classified. Rows that need attention can be fixed,
//! converted to gaps or have their media copied in. The compiler then places
//! every good row on a single cursor across one video track and eight audio
//! tracks, converting source frames to the timeline rate, and writes an xmeml
//! (version 4) document that editors can import.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cutlist_core::{CoreConfigBuilder, EventDispatcher, FfprobeInspector, Session};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let config = CoreConfigBuilder::new()
//!     .shot_list(PathBuf::from("/projects/promo/shots.csv"))
//!     .video_dir(PathBuf::from("/projects/promo/footage"))
//!     .build();
//! config.validate().unwrap();
//!
//! let events = EventDispatcher::new();
//! let mut session = Session::new(config, Arc::new(FfprobeInspector::new()));
//! session.scan_shot_list(&events).unwrap();
//! session.bulk_force_gap(0);
//! session.save().unwrap();
//!
//! let report = session.generate(&events).unwrap();
//! println!("{} clips written to {}", report.compile.clips, report.output_path.display());
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod external;
pub mod file_logging;
pub mod media;
pub mod session;
pub mod store;
pub mod timecode;
pub mod timeline;
pub mod utils;
pub mod validation;
pub mod worker;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, Resolution, TimelineFps};
pub use error::{CoreError, CoreResult, TimecodeError};
pub use events::{Event, EventDispatcher, EventHandler};
pub use external::{FfprobeInspector, MediaInspector};
pub use media::{ColorProfile, MediaDescriptor};
pub use session::{BulkGapReport, GenerateReport, ScanSummary, Session};
pub use timecode::{FrameRate, frames, parse_range, to_timecode};
pub use timeline::{CompileReport, DroppedRow, Sequence, TimelineCompiler};
pub use utils::{format_bytes, get_filename_safe};
pub use validation::{RowRecord, RowStatus, RowType, ShotEntry, Validator};
pub use worker::{JobHandle, OperationKind, Worker};
