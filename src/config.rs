//! JSON configuration file handling.
//!
//! The configuration file is optional in practice: a missing file is created
//! with defaults, a malformed one is reported and replaced by defaults in
//! memory. Neither case fails startup. Messages are collected in
//! [`LoadedConfig`] because loading happens before logging is initialized
//! (the log directory lives under `download_path`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default format selection: best mp4 video + m4a audio, falling back to best single file.
pub const DEFAULT_VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Default output filename template.
pub const DEFAULT_FILENAME_TEMPLATE: &str = "%(title)s-%(id)s.%(ext)s";

/// Default container for merged audio/video.
pub const DEFAULT_MERGE_OUTPUT_FORMAT: &str = "mp4";

/// Default clipboard poll interval in seconds.
pub const DEFAULT_CHECK_INTERVAL_SECS: f64 = 1.0;

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// User configuration. Keys missing from the file keep their defaults;
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory downloads (and the `logs/` directory) are written to.
    pub download_path: PathBuf,
    /// Format selection expression passed to the download tool.
    pub video_format: String,
    /// Show desktop notifications for lifecycle events.
    pub enable_notifications: bool,
    /// Clipboard poll interval in seconds.
    pub check_interval: f64,
    /// Output filename template (`%(title)s`, `%(id)s`, `%(ext)s`, ...).
    pub filename_template: String,
    /// Container used when merging audio and video streams.
    pub merge_output_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            download_path: default_download_path(),
            video_format: DEFAULT_VIDEO_FORMAT.to_string(),
            enable_notifications: true,
            check_interval: DEFAULT_CHECK_INTERVAL_SECS,
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            merge_output_format: DEFAULT_MERGE_OUTPUT_FORMAT.to_string(),
        }
    }
}

impl AppConfig {
    /// Poll interval as a `Duration`.
    ///
    /// Only valid after [`load_or_create`] (or on defaults), which replaces
    /// non-positive and non-finite values.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.check_interval)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_CHECK_INTERVAL_SECS))
    }

    /// Directory for daily log files.
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.download_path.join("logs")
    }

    /// Replaces values that cannot work at runtime, describing each change.
    fn sanitize(&mut self) -> Vec<String> {
        let mut adjustments = Vec::new();
        if !(self.check_interval.is_finite() && self.check_interval > 0.0) {
            adjustments.push(format!(
                "check_interval {} is not a positive number of seconds, using {DEFAULT_CHECK_INTERVAL_SECS}",
                self.check_interval
            ));
            self.check_interval = DEFAULT_CHECK_INTERVAL_SECS;
        }
        adjustments
    }
}

fn default_download_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
        .join("YouTube")
}

/// Where the effective configuration came from.
#[derive(Debug)]
pub enum ConfigOrigin {
    /// Read from the file.
    File,
    /// The file did not exist and was created with defaults.
    CreatedDefault,
    /// The file did not exist and could not be created; defaults in memory.
    CreateFailed(ConfigError),
    /// The file exists but could not be read or parsed; defaults in memory.
    Invalid(ConfigError),
}

/// Effective configuration plus how it was obtained.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub origin: ConfigOrigin,
    /// Values that were replaced because they could not be used.
    pub adjustments: Vec<String>,
}

/// Loads `path`, creating it with defaults when missing.
///
/// Never fails: read, parse and write errors are reported through
/// [`LoadedConfig::origin`] and defaults are used.
#[must_use]
pub fn load_or_create(path: &Path) -> LoadedConfig {
    let (mut config, origin) = if path.exists() {
        match read_config(path) {
            Ok(config) => (config, ConfigOrigin::File),
            Err(error) => (AppConfig::default(), ConfigOrigin::Invalid(error)),
        }
    } else {
        let config = AppConfig::default();
        let origin = match write_config(path, &config) {
            Ok(()) => ConfigOrigin::CreatedDefault,
            Err(error) => ConfigOrigin::CreateFailed(error),
        };
        (config, origin)
    };

    let adjustments = config.sanitize();
    LoadedConfig {
        config,
        path: path.to_path_buf(),
        origin,
        adjustments,
    }
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a configuration file as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ConfigError::Write`] if the file cannot be written.
pub fn write_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(config)
        .map_err(|error| write_error(std::io::Error::other(error)))?;
    fs::write(path, json + "\n").map_err(write_error)
}
