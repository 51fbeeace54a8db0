use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
