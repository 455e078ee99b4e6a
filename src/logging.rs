//! Logging for Bulk Video Compressor
//!
//! Runs log to the terminal and to a file under the platform log
//! directory, so per-file failures are still available after the window
//! closes. The file keeps Debug detail for bug reports.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "bulkvideo.log";

/// Rotate once the log grows past this size
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Platform log directory
///
/// `~/Library/Logs/Bulk-Video-Compressor` on macOS, a `logs` folder
/// under the local data directory elsewhere.
pub fn log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Logs").join("Bulk-Video-Compressor"))
    } else {
        dirs::data_local_dir().map(|d| d.join("Bulk-Video-Compressor").join("logs"))
    }
}

/// Where the current log file lives
pub fn log_file_path() -> Option<PathBuf> {
    log_directory().map(|d| d.join(LOG_FILE_NAME))
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build()
}

/// Shift an oversized log aside so the file never grows unbounded
fn rotate_if_oversized(log_path: &Path) {
    let Ok(metadata) = fs::metadata(log_path) else {
        return;
    };
    if metadata.len() > MAX_LOG_BYTES {
        let rotated = log_path.with_file_name(format!("{}.old", LOG_FILE_NAME));
        let _ = fs::rename(log_path, rotated);
    }
}

/// Create the log directory and open the log file in append mode
fn open_log_file() -> Result<(PathBuf, File), String> {
    let log_dir = log_directory().ok_or_else(|| "no log directory available".to_string())?;

    fs::create_dir_all(&log_dir)
        .map_err(|e| format!("could not create {}: {}", log_dir.display(), e))?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_oversized(&log_path);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("could not open {}: {}", log_path.display(), e))?;

    Ok((log_path, file))
}

/// Initialize combined terminal + file logging
///
/// Terminal shows Info and above; the file captures Debug. When the file
/// cannot be opened, logging falls back to terminal-only and the app
/// keeps running. Returns the log file path when file logging is active.
pub fn init_logging() -> Option<PathBuf> {
    let term = TermLogger::new(
        LevelFilter::Info,
        log_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let log_path = match open_log_file() {
        Ok((log_path, file)) => {
            let loggers: Vec<Box<dyn SharedLogger>> =
                vec![term, WriteLogger::new(LevelFilter::Debug, log_config(), file)];
            if CombinedLogger::init(loggers).is_err() {
                eprintln!("Warning: logger already initialized");
            }
            Some(log_path)
        }
        Err(e) => {
            eprintln!("Warning: file logging unavailable: {}", e);
            let loggers: Vec<Box<dyn SharedLogger>> = vec![term];
            let _ = CombinedLogger::init(loggers);
            None
        }
    };

    log::info!("=== Bulk Video Compressor session started ===");
    if let Some(ref path) = log_path {
        log::debug!("Log file: {}", path.display());
    }

    log_path
}
