//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartFile},
};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-request timeout applied when the caller sets none
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest (each request/response is scoped to its call)
/// - A client-wide timeout plus optional per-request timeouts
/// - TLS support via rustls
/// - Single-file multipart bodies
///
/// Requests are sent exactly once. Retrying is a policy decision left to
/// the caller.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .user_agent(concat!("image-uploader/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    /// Convert a bridge multipart file into a one-part reqwest form
    fn build_form(file: MultipartFile) -> Result<Form> {
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| {
                BridgeError::OperationFailed(format!(
                    "Invalid multipart content type '{}': {}",
                    file.content_type, e
                ))
            })?;

        Ok(Form::new().part(file.field_name, part))
    }

    /// Build reqwest request from bridge request
    fn build_request(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder> {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        // Add headers
        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        // Multipart wins over a raw body; reqwest sets the boundary header
        if let Some(file) = request.multipart {
            req = req.multipart(Self::build_form(file)?);
        } else if let Some(body) = request.body {
            req = req.body(body);
        }

        // Add timeout if specified
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        Ok(req)
    }

    fn map_send_error(e: reqwest::Error) -> BridgeError {
        if e.is_timeout() {
            BridgeError::Timeout(e.to_string())
        } else if e.is_connect() {
            BridgeError::OperationFailed(format!("Connection failed: {}", e))
        } else {
            BridgeError::OperationFailed(e.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = ?request.method, url = %request.url, "Executing HTTP request");

        let req_builder = self.build_request(request)?;

        let response = req_builder.send().await.map_err(|e| {
            warn!(error = %e, "HTTP request failed");
            Self::map_send_error(e)
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response.bytes().await.map_err(Self::map_send_error)?;

        debug!(status = status, size = body.len(), "HTTP response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
