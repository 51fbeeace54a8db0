use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Source directory does not exist: {}", .0.display())]
    SourceDirectoryMissing(PathBuf),

    #[error("Failed to decode image {file_name}: {reason}")]
    ImageDecode { file_name: String, reason: String },

    #[error("Failed to write thumbnail {file_name}: {reason}")]
    ThumbnailWrite { file_name: String, reason: String },

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
