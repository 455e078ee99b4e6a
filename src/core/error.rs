//! Error taxonomy for the compression engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by configuration validation, candidate selection,
/// and per-file transcoding.
///
/// `Transcode` (and `InvalidBitrate`, when a malformed spec only shows up
/// at the adapter) are recorded per file and the run continues; every
/// other variant aborts a run before any file is touched.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The input directory does not exist or is not a directory
    #[error("input directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A bitrate spec that is not `<positive integer><K|M>`
    #[error("invalid bitrate spec \"{0}\": expected <positive integer><K|M>")]
    InvalidBitrate(String),

    /// Any other unusable configuration (empty paths, negative threshold,
    /// unwritable output directory)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A second `start` while a run is active
    #[error("a compression run is already in progress")]
    AlreadyRunning,

    /// A single file failed to transcode
    #[error("failed to compress {filename}: {cause}")]
    Transcode { filename: String, cause: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_not_found_names_the_path() {
        let err = CompressError::DirectoryNotFound(PathBuf::from("/missing/videos"));
        assert!(err.to_string().contains("/missing/videos"));
    }

    #[test]
    fn test_transcode_message_names_file_and_cause() {
        let err = CompressError::Transcode {
            filename: "clip.mp4".to_string(),
            cause: "exit status 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("clip.mp4"));
        assert!(msg.contains("exit status 1"));
    }

    #[test]
    fn test_invalid_bitrate_echoes_the_spec() {
        let err = CompressError::InvalidBitrate("abcK".to_string());
        assert!(err.to_string().contains("abcK"));
    }
}
