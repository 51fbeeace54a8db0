//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge traits
//! using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TokioFileSystem};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(30))?;
//!     let fs = TokioFileSystem::new();
//!
//!     // Hand both to the auth, file server and sync layers
//!     Ok(())
//! }
//! ```

mod filesystem;
mod http;

pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
