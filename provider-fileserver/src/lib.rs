//! # File Server Provider
//!
//! Client for the product image file server.
//!
//! ## Overview
//!
//! This module provides:
//! - Inventory listing of a remote collection (`GET /images/{collection}`)
//! - Single-file multipart uploads (`POST /images/{collection}`)
//! - The [`ImageStore`] trait the sync pipeline is written against
//!
//! Neither operation returns errors to its caller. A failed listing yields an
//! empty, degraded [`RemoteFileSet`]; a failed upload yields `false`. Deciding
//! whether to continue is left to the sync driver.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{FileserverConnector, ImageStore};
pub use error::{FileserverError, Result};
pub use types::{Collection, FileListResponse, RemoteFileSet, UploadTarget};
