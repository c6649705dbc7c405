//! PAX Configuration Management
//!
//! Handles configuration from environment variables and TOML files,
//! with defaults matching the extractor's documented bounds.
//!
//! Author: hephaex@gmail.com

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Extraction engine settings
    pub extractor: ExtractorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        config.extractor.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay values produced by `lookup` onto this configuration.
    ///
    /// `lookup` maps a variable name to its value; unset variables leave the
    /// current value untouched.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Extractor
        if let Some(value) = lookup("PAX_MIN_LENGTH") {
            self.extractor.min_length = parse_value("PAX_MIN_LENGTH", value)?;
        }
        if let Some(value) = lookup("PAX_MAX_LENGTH") {
            self.extractor.max_length = parse_value("PAX_MAX_LENGTH", value)?;
        }
        if let Some(value) = lookup("PAX_VERBOSE") {
            self.extractor.verbose = parse_flag("PAX_VERBOSE", value)?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = lookup("LOG_JSON") {
            self.logging.json_format = parse_flag("LOG_JSON", value)?;
        }

        self.extractor.validate()?;
        Ok(self)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        })
}

fn parse_flag(key: &str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

/// Extraction engine configuration
///
/// Only the length bounds influence extraction decisions; `verbose` changes
/// the level diagnostics are logged at and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum abstract length in characters
    pub min_length: usize,

    /// Maximum abstract length in characters
    pub max_length: usize,

    /// Report extraction progress at info level
    pub verbose: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_length: 50,
            max_length: 5000,
            verbose: false,
        }
    }
}

impl ExtractorConfig {
    /// Check that the length bounds form a non-empty range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_length < self.min_length {
            return Err(ConfigError::InvalidValue {
                key: "extractor.max_length".to_string(),
                value: format!(
                    "{} (must be >= min_length {})",
                    self.max_length, self.min_length
                ),
            });
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
