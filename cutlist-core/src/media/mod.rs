//! Media resolution and description module
//!
//! This module finds the file behind a shot list entry and turns the
//! inspector's report into a [`MediaDescriptor`].

pub mod descriptor;
pub mod resolver;

// Re-export commonly used types
pub use descriptor::{ColorProfile, MediaDescriptor, VideoInfo, probe};
pub use resolver::resolve;
