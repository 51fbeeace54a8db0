use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
