//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the image uploader:
//! - Logging and tracing infrastructure
//! - Configuration loading and validation
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other crates and the
//! binary depend on. It establishes the logging conventions and the single
//! explicit configuration value that is built once at startup and passed by
//! reference into the sync pipeline.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{FileserverConfig, IamConfig, UploadSettings, UploaderConfig};
pub use error::{Error, Result};
