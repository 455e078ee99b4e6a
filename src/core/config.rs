//! Run configuration and bitrate handling
//!
//! Contains the typed target bitrate (value + K/M unit, wire form
//! `"1500K"` / `"4M"`), the per-run configuration value object handed to
//! the batch controller, and the persisted application settings.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::CompressError;

/// Bitrate unit: kilobits or megabits per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitrateUnit {
    K,
    M,
}

impl BitrateUnit {
    /// Suffix used in the wire-format spec ("1500K", "4M")
    pub fn as_str(&self) -> &'static str {
        match self {
            BitrateUnit::K => "K",
            BitrateUnit::M => "M",
        }
    }

    /// Suffix understood by ffmpeg's `-b:v` argument
    pub fn ffmpeg_suffix(&self) -> &'static str {
        match self {
            BitrateUnit::K => "k",
            BitrateUnit::M => "M",
        }
    }

    /// The other unit (for the UI's unit toggle)
    pub fn toggled(&self) -> Self {
        match self {
            BitrateUnit::K => BitrateUnit::M,
            BitrateUnit::M => BitrateUnit::K,
        }
    }
}

impl fmt::Display for BitrateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated target bitrate: positive integer value plus unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateSpec {
    value: u32,
    unit: BitrateUnit,
}

impl BitrateSpec {
    pub fn new(value: u32, unit: BitrateUnit) -> Result<Self, CompressError> {
        if value == 0 {
            return Err(CompressError::InvalidBitrate(format!("0{}", unit)));
        }
        Ok(Self { value, unit })
    }

    /// Parse the wire form `<positive integer><K|M>`.
    ///
    /// The unit is case-sensitive: `"1500k"` is rejected, `"1500K"` is not.
    pub fn parse(spec: &str) -> Result<Self, CompressError> {
        let invalid = || CompressError::InvalidBitrate(spec.to_string());

        let unit = if spec.ends_with('K') {
            BitrateUnit::K
        } else if spec.ends_with('M') {
            BitrateUnit::M
        } else {
            return Err(invalid());
        };

        let digits = &spec[..spec.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(value, unit).map_err(|_| invalid())
    }

    #[allow(dead_code)]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[allow(dead_code)]
    pub fn unit(&self) -> BitrateUnit {
        self.unit
    }

    /// Rendering for ffmpeg's `-b:v` ("1500k", "4M")
    pub fn ffmpeg_arg(&self) -> String {
        format!("{}{}", self.value, self.unit.ffmpeg_suffix())
    }
}

impl fmt::Display for BitrateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Configuration for one batch run
///
/// Built by the UI shell (or a test) and handed to the batch controller;
/// immutable for the duration of the run.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub bitrate_value: u32,
    pub bitrate_unit: BitrateUnit,
    /// Only files strictly larger than this are compressed
    pub min_size_mb: f64,
}

impl RunConfiguration {
    /// The wire-format bitrate spec handed to the transcoder ("1500K")
    pub fn bitrate_spec(&self) -> String {
        format!("{}{}", self.bitrate_value, self.bitrate_unit)
    }

    /// Check the configuration before any filesystem work
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(CompressError::InvalidConfig(
                "no input folder selected".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CompressError::InvalidConfig(
                "no output folder selected".to_string(),
            ));
        }
        BitrateSpec::new(self.bitrate_value, self.bitrate_unit)?;
        if !self.min_size_mb.is_finite() || self.min_size_mb < 0.0 {
            return Err(CompressError::InvalidConfig(format!(
                "minimum size must be a non-negative number of megabytes, got {}",
                self.min_size_mb
            )));
        }
        Ok(())
    }
}

/// Application-wide settings
///
/// Last-used values, persisted to
/// `<data dir>/Bulk Video Compressor/app_settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_bitrate_value")]
    pub bitrate_value: u32,
    #[serde(default = "default_bitrate_unit")]
    pub bitrate_unit: BitrateUnit,
    #[serde(default = "default_min_size_mb")]
    pub min_size_mb: f64,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Local>>,
}

fn default_bitrate_value() -> u32 {
    4
}

fn default_bitrate_unit() -> BitrateUnit {
    BitrateUnit::M
}

fn default_min_size_mb() -> f64 {
    50.0
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            bitrate_value: default_bitrate_value(),
            bitrate_unit: default_bitrate_unit(),
            min_size_mb: default_min_size_mb(),
            last_run_at: None,
        }
    }
}

impl gpui::Global for AppSettings {}

impl AppSettings {
    const SETTINGS_FILE: &'static str = "app_settings.json";

    /// Get the app data directory, creating it if necessary
    fn get_app_data_dir() -> Result<PathBuf, String> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| "Could not determine data directory".to_string())?;

        let app_dir = data_dir.join("Bulk Video Compressor");

        if !app_dir.exists() {
            std::fs::create_dir_all(&app_dir)
                .map_err(|e| format!("Failed to create app data directory: {}", e))?;
        }

        Ok(app_dir)
    }

    /// Load app settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(settings) => {
                log::debug!("Loaded app settings from disk");
                settings
            }
            Err(e) => {
                log::debug!("Using default app settings: {}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, String> {
        let app_dir = Self::get_app_data_dir()?;
        let settings_path = app_dir.join(Self::SETTINGS_FILE);

        if !settings_path.exists() {
            return Err("Settings file not found".to_string());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| format!("Failed to read settings: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Save app settings to disk
    pub fn save(&self) -> Result<(), String> {
        let app_dir = Self::get_app_data_dir()?;
        let settings_path = app_dir.join(Self::SETTINGS_FILE);

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&settings_path, json)
            .map_err(|e| format!("Failed to write settings: {}", e))?;

        log::debug!("Saved app settings to {:?}", settings_path);
        Ok(())
    }
}
