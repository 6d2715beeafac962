//! Search configuration, loadable from TOML.

use crate::evaluation::MAX_PLY;
use crate::tt::MAX_SIZE_MB;
use crate::tt::DEFAULT_SIZE_MB;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A setting is outside its allowed range.
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Limits and switches for [`crate::Session`] searches.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest iteration to run. Defaults to 6.
    #[serde(default = "default_max_depth")]
    pub max_depth: u8,
    /// Transposition table size in megabytes. Defaults to 16.
    #[serde(default = "default_tt_size_mb")]
    pub tt_size_mb: usize,
    /// Wall-clock budget per search; unlimited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_time_ms: Option<u64>,
    /// Resolve captures at the horizon. Defaults to true.
    #[serde(default = "default_quiescence")]
    pub quiescence: bool,
}

fn default_max_depth() -> u8 {
    6
}

fn default_tt_size_mb() -> usize {
    DEFAULT_SIZE_MB
}

fn default_quiescence() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: default_max_depth(),
            tt_size_mb: default_tt_size_mb(),
            move_time_ms: None,
            quiescence: default_quiescence(),
        }
    }
}

impl SearchConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed TOML and
    /// [`ConfigError::InvalidValue`] for out-of-range settings.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, and
    /// the errors of [`Self::from_toml_str`] otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> String {
        // Plain scalars only; serialization cannot fail.
        toml::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth as usize >= MAX_PLY {
            return Err(ConfigError::InvalidValue {
                field: "max_depth",
                reason: format!("{} is not in 1..={}", self.max_depth, MAX_PLY - 1),
            });
        }
        if self.tt_size_mb == 0 || self.tt_size_mb > MAX_SIZE_MB {
            return Err(ConfigError::InvalidValue {
                field: "tt_size_mb",
                reason: format!("{} is not in 1..={}", self.tt_size_mb, MAX_SIZE_MB),
            });
        }
        Ok(())
    }

    pub fn move_time(&self) -> Option<Duration> {
        self.move_time_ms.map(Duration::from_millis)
    }
}
