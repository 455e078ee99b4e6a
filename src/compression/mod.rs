//! Video compression engine
//!
//! Candidate batching, ffmpeg subprocess handling, and progress events.

mod batch;
mod events;
mod ffmpeg;

pub use batch::{BatchController, BatchPhase};
pub use events::{BatchEvent, BatchReport, FileFailure};
pub use ffmpeg::compress_file;

use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable that overrides ffmpeg discovery
pub const FFMPEG_ENV_VAR: &str = "BULKVIDEO_FFMPEG";

/// Locate the ffmpeg binary to use
///
/// Honors the `BULKVIDEO_FFMPEG` override; otherwise relies on `ffmpeg`
/// being resolvable through PATH.
pub fn locate_ffmpeg() -> PathBuf {
    if let Ok(path) = std::env::var(FFMPEG_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from("ffmpeg")
}

/// Verify that ffmpeg can be executed
///
/// Runs `ffmpeg -version` once at startup. A failure here is shown to the
/// user but does not abort the app; each run surfaces its own transcode
/// errors if the binary stays missing.
pub fn verify_ffmpeg(ffmpeg_path: &Path) -> Result<(), String> {
    match Command::new(ffmpeg_path).arg("-version").output() {
        Ok(output) if output.status.success() => {
            log::debug!("ffmpeg verified at {:?}", ffmpeg_path);
            Ok(())
        }
        Ok(output) => Err(format!(
            "ffmpeg at {:?} exited with status {}",
            ffmpeg_path, output.status
        )),
        Err(e) => Err(format!("could not run ffmpeg at {:?}: {}", ffmpeg_path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_ffmpeg_missing_binary() {
        let result = verify_ffmpeg(Path::new("/nonexistent/ffmpeg"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("could not run ffmpeg"));
    }

    #[test]
    fn test_locate_ffmpeg_returns_a_path() {
        // Either the env override or the bare PATH lookup name
        let path = locate_ffmpeg();
        assert!(!path.as_os_str().is_empty());
    }
}
