//! Error type definitions for m3u-curator
//!
//! The pipeline core is almost entirely infallible (malformed playlist
//! entries are skipped, missing fields stay `None`), so the hierarchy is
//! intentionally flat: one application error covering configuration,
//! validation and the I/O performed by the command line front-end.

use thiserror::Error;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur in the application.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors raised while reading or writing artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel store (JSON) encoding/decoding failures
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file parse failures
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// Configuration file serialization failures
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
