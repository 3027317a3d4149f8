//! Error types for the banner pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving, rendering, or capturing
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to bind or run the local dev server
    #[error("Dev server failed: {0}")]
    ServerError(String),

    /// Failed to launch or configure the browser
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load the page
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// Failed to measure or capture the page
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error while reading the site or writing the image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CaptureError(err.to_string())
    }
}
