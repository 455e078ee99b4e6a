//! Test fixtures for selector and batch tests
//!
//! Candidate selection and batch accounting only look at file names and
//! sizes, so fixtures are plain files extended to the wanted length; no
//! real video content (and no ffmpeg) is needed to exercise them.

#![cfg(test)]

use std::fs::File;
use std::path::{Path, PathBuf};

pub const MB: u64 = 1024 * 1024;

/// Create a file of exactly `size_bytes` at `dir/name`
pub fn create_sized_file(dir: &Path, name: &str, size_bytes: u64) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("Failed to create fixture file");
    file.set_len(size_bytes).expect("Failed to size fixture file");
    path
}

/// Create a fixture video file sized in whole binary megabytes
pub fn create_video_mb(dir: &Path, name: &str, size_mb: u64) -> PathBuf {
    create_sized_file(dir, name, size_mb * MB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_sized_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_sized_file(temp_dir.path(), "clip.mp4", 1234);
        assert!(path.exists());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 1234);
    }

    #[test]
    fn test_create_video_mb() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_video_mb(temp_dir.path(), "clip.mov", 3);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 3 * MB);
    }
}
