//! Error types for the stoop client.

use std::time::Duration;
use thiserror::Error;

/// Search request errors - surfaced to the UI as notices.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Could not reach the server.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16 },

    /// The response body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The request did not complete in time.
    #[error("request timed out after {duration:?}")]
    Timeout { duration: Duration },
}

/// Geolocation errors.
#[derive(Debug, Error)]
pub enum GeoError {
    /// No positioning capability on this device.
    #[error("geolocation not supported")]
    Unsupported,

    /// The user declined the location permission.
    #[error("location permission denied")]
    PermissionDenied,

    /// The position request timed out.
    #[error("location request timed out")]
    Timeout,

    /// Any other provider failure.
    #[error("could not get location: {0}")]
    Unavailable(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
