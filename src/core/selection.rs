//! Candidate discovery for batch compression
//!
//! Scans the top level of the input folder for video files large enough
//! to be worth re-encoding. Subdirectories are never descended into.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::CompressError;

/// File name suffixes eligible for compression. Matching is case-sensitive.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".avi", ".mov"];

const BYTES_PER_MB: f64 = (1024 * 1024) as f64;

/// A file selected for compression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl VideoCandidate {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    /// The file name component, for logs and the destination name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn has_allowed_extension(name: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|ext| name.ends_with(ext))
}

/// List the files directly inside `input_dir` that match the extension
/// allow-list and are strictly larger than `min_size_mb`.
///
/// Files at exactly the threshold are excluded; each file skipped for
/// size is logged with its size and the threshold. Entries come back in
/// filesystem enumeration order, which is stable within a call but not
/// across runs.
pub fn select_candidates(
    input_dir: &Path,
    allowed_extensions: &[&str],
    min_size_mb: f64,
) -> Result<Vec<VideoCandidate>, CompressError> {
    if !input_dir.is_dir() {
        return Err(CompressError::DirectoryNotFound(input_dir.to_path_buf()));
    }

    let mut candidates = Vec::new();

    for entry in WalkDir::new(input_dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !has_allowed_extension(name, allowed_extensions) {
            continue;
        }

        let Ok(metadata) = std::fs::metadata(path) else {
            continue;
        };
        let candidate = VideoCandidate {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
        };

        if candidate.size_mb() > min_size_mb {
            candidates.push(candidate);
        } else {
            log::info!(
                "Skipped {}: {} is not greater than {} MB",
                name,
                format_size_mb(candidate.size_bytes),
                min_size_mb
            );
        }
    }

    Ok(candidates)
}

/// Format a byte count as binary megabytes for display
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_sized_file, create_video_mb, MB};
    use tempfile::TempDir;

    #[test]
    fn test_nonexistent_directory() {
        let result = select_candidates(Path::new("/nonexistent/path"), VIDEO_EXTENSIONS, 0.0);
        assert!(matches!(result, Err(CompressError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_file_path_is_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_video_mb(temp_dir.path(), "clip.mp4", 1);
        let result = select_candidates(&file, VIDEO_EXTENSIONS, 0.0);
        assert!(matches!(result, Err(CompressError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let candidates = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 50.0).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_size_threshold_scenario() {
        // 10/60/80 MB at a 50 MB threshold: only the two large files qualify
        let temp_dir = TempDir::new().unwrap();
        create_video_mb(temp_dir.path(), "small.mp4", 10);
        create_video_mb(temp_dir.path(), "medium.mp4", 60);
        create_video_mb(temp_dir.path(), "large.mp4", 80);

        let candidates = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 50.0).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.size_mb() > 50.0));
    }

    #[test]
    fn test_exactly_at_threshold_is_excluded() {
        let temp_dir = TempDir::new().unwrap();
        create_sized_file(temp_dir.path(), "exact.mp4", 50 * MB);
        create_sized_file(temp_dir.path(), "just_over.mp4", 50 * MB + 1);

        let candidates = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 50.0).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_name(), "just_over.mp4");
    }

    #[test]
    fn test_zero_threshold_excludes_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        create_sized_file(temp_dir.path(), "empty.mp4", 0);
        create_sized_file(temp_dir.path(), "tiny.mp4", 1);

        let candidates = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 0.0).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_name(), "tiny.mp4");
    }

    #[test]
    fn test_extension_allow_list() {
        let temp_dir = TempDir::new().unwrap();
        create_video_mb(temp_dir.path(), "a.mp4", 1);
        create_video_mb(temp_dir.path(), "b.avi", 1);
        create_video_mb(temp_dir.path(), "c.mov", 1);
        create_video_mb(temp_dir.path(), "d.mkv", 1);
        create_video_mb(temp_dir.path(), "notes.txt", 1);

        let mut names: Vec<String> = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 0.0)
            .unwrap()
            .iter()
            .map(|c| c.file_name())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.mp4", "b.avi", "c.mov"]);
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        create_video_mb(temp_dir.path(), "upper.MP4", 1);
        create_video_mb(temp_dir.path(), "lower.mp4", 1);

        let candidates = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 0.0).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_name(), "lower.mp4");
    }

    #[test]
    fn test_subdirectories_are_not_descended() {
        let temp_dir = TempDir::new().unwrap();
        create_video_mb(temp_dir.path(), "top.mp4", 1);
        let sub = temp_dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        create_video_mb(&sub, "nested.mp4", 1);

        let candidates = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 0.0).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_name(), "top.mp4");
    }

    #[test]
    fn test_selection_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        create_video_mb(temp_dir.path(), "a.mp4", 60);
        create_video_mb(temp_dir.path(), "b.mp4", 10);
        create_video_mb(temp_dir.path(), "c.mov", 70);

        let first = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 50.0).unwrap();
        let second = select_candidates(temp_dir.path(), VIDEO_EXTENSIONS, 50.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_candidate_size_mb() {
        let candidate = VideoCandidate {
            path: PathBuf::from("/videos/clip.mp4"),
            size_bytes: 60 * MB,
        };
        assert_eq!(candidate.size_mb(), 60.0);
    }

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size_mb(60 * MB), "60.00 MB");
        assert_eq!(format_size_mb(MB / 2), "0.50 MB");
    }
}
