//! Persistent storage for the work interval.
//!
//! The interval is stored as a single JSON record (`{"interval": 300}`) in the
//! per-user configuration directory. Loading never fails: anything missing or
//! unusable falls back to the default interval.

mod error;

pub use error::ConfigError;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::WorkInterval;

/// Directory name under the user's configuration directory.
pub const APP_DIR_NAME: &str = "interval-timer";

/// File name of the interval record.
pub const CONFIG_FILE_NAME: &str = "timer-config.json";

/// On-disk shape of the interval record.
#[derive(Debug, Serialize, Deserialize)]
struct IntervalRecord {
    interval: i64,
}

/// Loads and saves the work interval.
#[derive(Debug, Clone)]
pub struct IntervalStore {
    path: PathBuf,
}

impl IntervalStore {
    /// Creates a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default location of the interval record.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no per-user
    /// configuration directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Creates a store at the default location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no per-user
    /// configuration directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::default_path().map(Self::new)
    }

    /// Returns the path of the interval record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored interval, falling back to the default.
    pub fn load(&self) -> WorkInterval {
        match self.try_load() {
            Ok(Some(interval)) => {
                debug!(interval = interval.as_secs(), "保存済みのインターバルを読み込みました");
                interval
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "設定ファイルがないため既定値を使用します");
                WorkInterval::default()
            }
            Err(e) => {
                warn!(error = %e, "設定を読み込めないため既定値を使用します");
                WorkInterval::default()
            }
        }
    }

    /// Loads the stored interval.
    ///
    /// Returns `Ok(None)` when no record has been written yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid record, or
    /// holds a value that is not a positive number of seconds.
    pub fn try_load(&self) -> Result<Option<WorkInterval>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let record: IntervalRecord = serde_json::from_str(&content)?;
        WorkInterval::from_signed_secs(record.interval)
            .map(Some)
            .ok_or(ConfigError::InvalidValue(record.interval))
    }

    /// Overwrites the stored interval.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the directory or file cannot be written.
    pub fn save(&self, interval: WorkInterval) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let record = IntervalRecord {
            interval: i64::from(interval.as_secs()),
        };
        let json = serde_json::to_string(&record)?;
        fs::write(&self.path, json).map_err(write_err)?;

        debug!(interval = interval.as_secs(), path = %self.path.display(), "インターバルを保存しました");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
