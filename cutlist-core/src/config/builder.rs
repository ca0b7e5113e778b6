// ============================================================================
// cutlist-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for assembling a session configuration from CLI
// arguments. Optional values keep their defaults when not set.
//
// KEY COMPONENTS:
// - CoreConfigBuilder: Builder struct for creating CoreConfig instances
// - Default values for optional parameters
//
// AI-ASSISTANT-INFO: Builder pattern implementation for CoreConfig

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, Resolution, TimelineFps};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use cutlist_core::config::{CoreConfigBuilder, Resolution};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .shot_list(PathBuf::from("shots.csv"))
///     .video_dir(PathBuf::from("footage"))
///     .resolution(Resolution::QHD_2K)
///     .parallel_scan(true)
///     .build();
///
/// assert_eq!(config.resolution.width, 2560);
/// assert!(config.parallel_scan);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    // Paths
    shot_list: Option<PathBuf>,
    video_dir: Option<PathBuf>,
    output_xml: Option<PathBuf>,

    // Optional fields with defaults
    timeline_fps: TimelineFps,
    resolution: Resolution,
    sequence_name: Option<String>,
    parallel_scan: bool,
    copy_chunk_size: usize,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    ///
    /// # Returns
    ///
    /// * A new CoreConfigBuilder instance
    pub fn new() -> Self {
        Self {
            shot_list: None,
            video_dir: None,
            output_xml: None,
            timeline_fps: TimelineFps::Auto,
            resolution: Resolution::default(),
            sequence_name: None,
            parallel_scan: false,
            copy_chunk_size: super::DEFAULT_COPY_CHUNK_SIZE,
        }
    }

    /// Sets the shot list (canonical tabular store).
    ///
    /// # Arguments
    ///
    /// * `shot_list` - Path to the CSV shot list
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    pub fn shot_list(mut self, shot_list: PathBuf) -> Self {
        self.shot_list = Some(shot_list);
        self
    }

    /// Sets the folder that holds the source videos.
    ///
    /// # Arguments
    ///
    /// * `video_dir` - Directory searched by the media resolver
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    pub fn video_dir(mut self, video_dir: PathBuf) -> Self {
        self.video_dir = Some(video_dir);
        self
    }

    /// Sets an explicit output document path.
    pub fn output_xml(mut self, output_xml: PathBuf) -> Self {
        self.output_xml = Some(output_xml);
        self
    }

    /// Sets the timeline frame rate selection.
    pub fn timeline_fps(mut self, timeline_fps: TimelineFps) -> Self {
        self.timeline_fps = timeline_fps;
        self
    }

    /// Sets the output frame size.
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the output sequence name.
    pub fn sequence_name(mut self, name: impl Into<String>) -> Self {
        self.sequence_name = Some(name.into());
        self
    }

    /// Enables parallel row validation.
    pub fn parallel_scan(mut self, enabled: bool) -> Self {
        self.parallel_scan = enabled;
        self
    }

    /// Sets the remediation copy chunk size in bytes.
    pub fn copy_chunk_size(mut self, bytes: usize) -> Self {
        self.copy_chunk_size = bytes;
        self
    }

    /// Builds the CoreConfig instance.
    ///
    /// Unset paths fall back to the defaults of [`CoreConfig`]; call
    /// [`CoreConfig::validate`] before using the result.
    ///
    /// # Returns
    ///
    /// * A new CoreConfig instance
    pub fn build(self) -> CoreConfig {
        let defaults = CoreConfig::default();
        CoreConfig {
            shot_list: self.shot_list.unwrap_or(defaults.shot_list),
            video_dir: self.video_dir.unwrap_or(defaults.video_dir),
            output_xml: self.output_xml,
            timeline_fps: self.timeline_fps,
            resolution: self.resolution,
            sequence_name: self.sequence_name,
            parallel_scan: self.parallel_scan,
            copy_chunk_size: self.copy_chunk_size,
        }
    }
}
