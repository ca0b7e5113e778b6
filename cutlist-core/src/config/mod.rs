//! Configuration structures and constants for the cutlist-core library.
//!
//! This module provides the configuration for a compile session: where the
//! shot list and source videos live, which frame rate and frame size the
//! output sequence uses, and how the scan and remediation copy behave.

mod builder;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use builder::CoreConfigBuilder;

use crate::error::{CoreError, CoreResult};
use crate::timecode::FrameRate;

// Default constants

/// Frame rate used for the timeline when `Auto` is selected but no source
/// frame rate has been observed yet.
pub const DEFAULT_TIMELINE_FPS: FrameRate = FrameRate::FPS_25;

/// Frame rates offered as fixed timeline presets, as `(numerator, denominator)`.
pub const TIMELINE_FPS_PRESETS: [(u32, u32); 6] =
    [(24, 1), (25, 1), (2997, 100), (30, 1), (5994, 100), (60, 1)];

/// Chunk size used when copying a missing source file into the video folder (4 MiB).
pub const DEFAULT_COPY_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Suffix appended to the shot list stem to name the output sequence.
pub const SEQUENCE_NAME_SUFFIX: &str = "_FinalSequence";

/// Suffix appended to the shot list stem to name the output document.
pub const OUTPUT_FILE_SUFFIX: &str = "_Final.xml";

/// Timeline frame rate selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineFps {
    /// Use the most common source frame rate found by the last scan.
    #[default]
    Auto,
    /// Use this rate regardless of the sources.
    Fixed(FrameRate),
}

impl FromStr for TimelineFps {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let invalid = || {
            CoreError::Config(format!(
                "invalid timeline frame rate '{s}'; expected auto, 24, 25, 29.97, 30, 59.94 or 60"
            ))
        };
        let rate = value.parse::<FrameRate>().map_err(|_| invalid())?.rounded();
        TIMELINE_FPS_PRESETS
            .iter()
            .filter_map(|&(num, den)| FrameRate::new(num, den))
            .find(|preset| *preset == rate)
            .map(Self::Fixed)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for TimelineFps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Fixed(rate) => write!(f, "{rate}"),
        }
    }
}

/// Frame size of the output sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const HD_1080P: Resolution = Resolution { width: 1920, height: 1080 };
    pub const QHD_2K: Resolution = Resolution { width: 2560, height: 1440 };
    pub const UHD_4K: Resolution = Resolution { width: 3840, height: 2160 };

    /// Creates a custom resolution, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::Config(format!(
                "resolution must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HD_1080P
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    /// Accepts `1080p`, `2k`/`qhd`, `4k`/`uhd` or a custom `WxH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1080p" | "hd" | "fhd" => Ok(Self::HD_1080P),
            "2k" | "qhd" | "1440p" => Ok(Self::QHD_2K),
            "4k" | "uhd" | "2160p" => Ok(Self::UHD_4K),
            custom => {
                let invalid = || CoreError::Config(format!("invalid resolution '{s}'"));
                let (width, height) = custom.split_once('x').ok_or_else(invalid)?;
                let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
                let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
                Self::new(width, height)
            }
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Main configuration structure for the cutlist-core library.
///
/// Usually assembled by the CLI through [`CoreConfigBuilder`] and handed to a
/// [`Session`](crate::session::Session). Everything except the two paths has
/// a default.
///
/// # Examples
///
/// ```rust,no_run
/// use cutlist_core::config::{CoreConfigBuilder, Resolution, TimelineFps};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .shot_list(PathBuf::from("/projects/promo/shots.csv"))
///     .video_dir(PathBuf::from("/projects/promo/footage"))
///     .timeline_fps(TimelineFps::Auto)
///     .resolution(Resolution::UHD_4K)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Canonical tabular store (the shot list CSV)
    pub shot_list: PathBuf,

    /// Folder that holds the source videos and their proxies
    pub video_dir: PathBuf,

    /// Output document path; defaults to `<stem>_Final.xml` next to the shot list
    pub output_xml: Option<PathBuf>,

    /// Timeline frame rate selection
    pub timeline_fps: TimelineFps,

    /// Output sequence frame size
    pub resolution: Resolution,

    /// Output sequence name; defaults to `<stem>_FinalSequence`
    pub sequence_name: Option<String>,

    /// Validate rows on the rayon pool instead of one after another
    pub parallel_scan: bool,

    /// Buffer size for the remediation copy
    pub copy_chunk_size: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            shot_list: PathBuf::from("shots.csv"),
            video_dir: PathBuf::from("."),
            output_xml: None,
            timeline_fps: TimelineFps::Auto,
            resolution: Resolution::default(),
            sequence_name: None,
            parallel_scan: false,
            copy_chunk_size: DEFAULT_COPY_CHUNK_SIZE,
        }
    }
}

impl CoreConfig {
    fn shot_list_stem(&self) -> String {
        self.shot_list
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Timeline".to_string())
    }

    /// The sequence name, falling back to `<shot list stem>_FinalSequence`.
    pub fn resolved_sequence_name(&self) -> String {
        match &self.sequence_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("{}{}", self.shot_list_stem(), SEQUENCE_NAME_SUFFIX),
        }
    }

    /// The output document path, falling back to `<stem>_Final.xml` beside the shot list.
    pub fn resolved_output_path(&self) -> PathBuf {
        match &self.output_xml {
            Some(path) => path.clone(),
            None => {
                let file_name = format!("{}{}", self.shot_list_stem(), OUTPUT_FILE_SUFFIX);
                match self.shot_list.parent() {
                    Some(parent) => parent.join(file_name),
                    None => PathBuf::from(file_name),
                }
            }
        }
    }

    /// Checks values that cannot be expressed through the types alone.
    pub fn validate(&self) -> CoreResult<()> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(CoreError::Config(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.copy_chunk_size == 0 {
            return Err(CoreError::Config("copy chunk size must be positive".to_string()));
        }
        if self.shot_list.as_os_str().is_empty() {
            return Err(CoreError::Config("no shot list given".to_string()));
        }
        Ok(())
    }
}
