//! FFmpeg subprocess handling for video compression

use std::path::Path;
use tokio::process::Command;

use crate::core::{BitrateSpec, CompressError};

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Compress a single video file to the target bitrate using ffmpeg
///
/// `bitrate_spec` is the wire form `<positive integer><K|M>` (e.g.
/// "1500K", "4M"); it is checked before ffmpeg is spawned, so a malformed
/// spec never touches the filesystem. On any transcode failure a
/// partially written destination file is removed before the error is
/// returned.
pub async fn compress_file(
    ffmpeg_path: &Path,
    input_path: &Path,
    output_path: &Path,
    bitrate_spec: &str,
) -> Result<(), CompressError> {
    let spec = BitrateSpec::parse(bitrate_spec)?;
    let filename = display_name(input_path);

    log::debug!(
        "Compressing: {} -> {} at {}",
        input_path.display(),
        output_path.display(),
        spec
    );

    let result = Command::new(ffmpeg_path)
        .arg("-i")
        .arg(input_path)
        .arg("-b:v")
        .arg(spec.ffmpeg_arg())
        .arg("-y")
        .arg(output_path)
        .output()
        .await;

    let cause = match result {
        Ok(output) if output.status.success() => return Ok(()),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.lines().last().unwrap_or("unknown error")
            )
        }
        Err(e) => format!("failed to spawn ffmpeg: {}", e),
    };

    remove_partial_output(output_path);

    Err(CompressError::Transcode { filename, cause })
}

/// Delete a partially written destination file, if any
fn remove_partial_output(output_path: &Path) {
    if output_path.exists() {
        if let Err(e) = std::fs::remove_file(output_path) {
            log::warn!(
                "Failed to remove partial output {}: {}",
                output_path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_malformed_spec_is_rejected_before_any_io() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("compressed_clip.mp4");

        let err = compress_file(
            Path::new("/nonexistent/ffmpeg"),
            Path::new("/fake/clip.mp4"),
            &output,
            "abcK",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CompressError::InvalidBitrate(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_spec_without_unit_is_rejected() {
        let err = compress_file(
            Path::new("/nonexistent/ffmpeg"),
            Path::new("/fake/clip.mp4"),
            Path::new("/tmp/compressed_clip.mp4"),
            "2000",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CompressError::InvalidBitrate(_)));
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_reports_transcode_error() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("compressed_clip.mp4");

        let err = compress_file(
            Path::new("/nonexistent/ffmpeg"),
            Path::new("/fake/clip.mp4"),
            &output,
            "2000K",
        )
        .await
        .unwrap_err();

        match err {
            CompressError::Transcode { filename, cause } => {
                assert_eq!(filename, "clip.mp4");
                assert!(cause.contains("spawn"));
            }
            other => panic!("expected Transcode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_removes_partial_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("compressed_clip.mp4");
        std::fs::write(&output, b"partial").unwrap();

        let result = compress_file(
            Path::new("/nonexistent/ffmpeg"),
            Path::new("/fake/clip.mp4"),
            &output,
            "2000K",
        )
        .await;

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_display_name_falls_back_for_odd_paths() {
        assert_eq!(display_name(Path::new("/videos/clip.mp4")), "clip.mp4");
        assert_eq!(display_name(Path::new("/")), "unknown");
        assert_eq!(display_name(&PathBuf::new()), "unknown");
    }
}
