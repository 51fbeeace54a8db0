//! Error types for the file server provider

use thiserror::Error;

/// File server provider errors
#[derive(Error, Debug)]
pub enum FileserverError {
    /// Server answered with a non-success status
    #[error("File server error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Upload target has no usable file name
    #[error("Invalid upload target: {0}")]
    InvalidTarget(String),

    /// Base URL cannot be used to address collections
    #[error("Invalid file server URL: {0}")]
    InvalidConfig(String),

    /// Bridge error (local file access)
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for file server operations
pub type Result<T> = std::result::Result<T, FileserverError>;
