//! Error types for the hotspot monitor
//!
//! This module defines all error types used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the hotspot monitor
#[derive(Error, Debug)]
pub enum Error {
    /// External tool missing, not runnable, or exited abnormally
    #[error("Probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// Probe produced output in an unexpected shape
    #[error("Malformed probe output: {0}")]
    MalformedOutput(String),

    /// Control script does not exist
    #[error("Script not found: {}", .0.display())]
    ScriptMissing(PathBuf),

    /// Control script could not be executed
    #[error("Script failed: {0}")]
    ScriptFailed(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// An operation exceeded its time bound
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a probe-unavailable error
    pub fn probe_unavailable(msg: impl Into<String>) -> Self {
        Self::ProbeUnavailable(msg.into())
    }

    /// Create a malformed-output error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedOutput(msg.into())
    }

    /// Create a missing-script error
    pub fn script_missing(path: impl Into<PathBuf>) -> Self {
        Self::ScriptMissing(path.into())
    }

    /// Create a script failure error
    pub fn script_failed(msg: impl Into<String>) -> Self {
        Self::ScriptFailed(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether this error came from a caller-supplied value
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
