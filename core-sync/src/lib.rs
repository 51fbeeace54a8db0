//! # Sync Module
//!
//! Reconciles a local product image directory with the file server.
//!
//! ## Overview
//!
//! One run is a single, one-way, non-deleting pass:
//! - Scan the source directory for eligible images
//! - Obtain a bearer token
//! - Snapshot the remote originals collection once
//! - For each local image missing remotely: upload the original, generate a
//!   thumbnail next to it, upload the thumbnail, remove the thumbnail
//!
//! The first failed step aborts the run. Nothing is persisted between runs.
//!
//! ## Components
//!
//! - **Filename Filter** (`filter`): Which file names count as product images
//! - **Thumbnail Generator** (`thumbnail`): Fixed-height proportional thumbnails
//! - **Scanner** (`scanner`): Non-recursive directory enumeration
//! - **Run State** (`job`): Phase state machine and run report
//! - **Sync Coordinator** (`coordinator`): Drives the pass

pub mod coordinator;
pub mod error;
pub mod filter;
pub mod job;
pub mod scanner;
pub mod thumbnail;

pub use coordinator::{SyncConfig, SyncCoordinator};
pub use error::{Result, SyncError};
pub use filter::{has_extension, is_eligible};
pub use job::{AbortReason, SyncPhase, SyncReport};
pub use scanner::LocalImage;
pub use thumbnail::{ThumbnailArtifact, ThumbnailGenerator};
