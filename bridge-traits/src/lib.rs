//! # Host Bridge Traits
//!
//! Platform abstraction traits the uploader core is written against.
//!
//! ## Overview
//!
//! This crate defines the contract between the reconciliation core and the
//! concrete host implementations. Each trait represents a capability that the
//! core requires but that is implemented elsewhere (see `bridge-desktop`),
//! which keeps the sync logic testable against in-memory doubles.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP request execution with
//!   bearer auth, URL-encoded forms and multipart file parts
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Directory listing,
//!   file reads and deletes in the local image directory
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., file paths, status codes)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared as
//! `Arc<dyn Trait>` across async tasks.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartFile};
pub use storage::{FileMetadata, FileSystemAccess};
