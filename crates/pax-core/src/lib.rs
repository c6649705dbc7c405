//! PAX Core - Shared types for the abstract extraction workspace
//!
//! This crate holds what the extraction engine and its front ends share:
//! - Common error types
//! - Configuration management (file, environment, defaults)
//! - Loading HTML documents from disk
//!
//! Author: hephaex@gmail.com

pub mod config;
pub mod document;

pub use config::{AppConfig, ConfigError, ExtractorConfig, LoggingConfig};
pub use document::read_html;

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for PAX operations
///
/// The extraction engine itself never fails on document content; these
/// errors cover the surroundings: bad configuration and unreadable input.
#[derive(Error, Debug)]
pub enum PaxError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PaxError>;
