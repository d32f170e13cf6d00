//! Error types for the Wedof sync.
//!
//! The fetch core only ever produces `Transport`, `Http` and
//! `MalformedResponse`. The remaining variants belong to configuration,
//! URL handling and the sheet writers around it.

use thiserror::Error;

/// Main error type for the Wedof sync library.
#[derive(Debug, Error)]
pub enum WedofError {
    /// Network level failure (DNS, connect, timeout, reset).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// The body was not JSON, or its envelope matched none of the known shapes.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Base URL or endpoint path could not be joined into a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid daily sync time.
    #[error("Invalid sync time: '{0}'. Expected HH:MM (e.g., 09:00)")]
    InvalidSyncTime(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl WedofError {
    /// HTTP status of the failure, if the API answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for Wedof sync operations.
pub type Result<T> = std::result::Result<T, WedofError>;
