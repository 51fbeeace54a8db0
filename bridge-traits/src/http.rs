//! HTTP Client Abstraction
//!
//! Provides async HTTP operations with bearer auth, form encoding and
//! single-file multipart uploads.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single file carried as one part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    /// Form field name of the part (`name=` in the content disposition)
    pub field_name: String,
    /// File name announced to the server (`filename=` in the content disposition)
    pub file_name: String,
    /// MIME type of the part
    pub content_type: String,
    /// Raw file bytes
    pub data: Bytes,
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub multipart: Option<MultipartFile>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            multipart: None,
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.into()))
    }

    /// Encode `fields` as an `application/x-www-form-urlencoded` body.
    pub fn form<T: Serialize + ?Sized>(mut self, fields: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(fields).map_err(|e| {
            BridgeError::OperationFailed(format!("Form encoding failed: {}", e))
        })?;
        self.body = Some(Bytes::from(encoded));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        Ok(self)
    }

    /// Attach a single file part. The transport sets the multipart
    /// `Content-Type` header (with its boundary) itself.
    pub fn multipart_file(mut self, file: MultipartFile) -> Self {
        self.multipart = Some(file);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Parse response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Get response body as UTF-8 string
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid UTF-8: {}", e)))
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client trait
///
/// This trait abstracts HTTP operations so the auth and file server clients
/// can be exercised against mocks. A call performs exactly one round trip;
/// implementations must not retry on their own.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest, HttpMethod};
///
/// async fn fetch_listing(client: &dyn HttpClient) -> Result<String> {
///     let request = HttpRequest::new(HttpMethod::Get, "http://localhost:3000/images/products");
///     let response = client.execute(request).await?;
///     response.text()
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    ///
    /// A non-2xx status is not an error at this level; callers inspect
    /// [`HttpResponse::status`].
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network connection fails
    /// - TLS validation fails
    /// - Request times out
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
