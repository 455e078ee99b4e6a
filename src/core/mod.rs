//! Core domain types and pure logic
//!
//! This module contains:
//! - The engine error taxonomy
//! - Bitrate spec, run configuration, and persisted app settings
//! - Candidate discovery (extension allow-list + size threshold)

mod config;
mod error;
mod selection;

pub use config::{AppSettings, BitrateSpec, BitrateUnit, RunConfiguration};
pub use error::CompressError;
pub use selection::{
    format_size_mb, select_candidates, VideoCandidate, VIDEO_EXTENSIONS,
};
