//! Resource Owner Password Credentials Grant
//!
//! Exchanges the configured username and password for an access token at
//! `{iam}/realms/{realm}/protocol/openid-connect/token`.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{PasswordGrantClient, PasswordGrantConfig, TokenProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let config = PasswordGrantConfig::new(
//!     "https://iam.example.com",
//!     "shop",
//!     "image-uploader",
//!     "uploader",
//!     "secret",
//! )?;
//!
//! let client = PasswordGrantClient::new(config, http_client);
//! let token = client.obtain_token().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{BearerToken, TokenResponse};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_runtime::config::IamConfig;
use core_runtime::logging::redact_if_sensitive;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Source of the bearer token used for uploads.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a fresh access token.
    ///
    /// # Errors
    ///
    /// Any failure means the run cannot proceed.
    async fn obtain_token(&self) -> Result<BearerToken>;
}

/// Settings for the password grant.
#[derive(Clone)]
pub struct PasswordGrantConfig {
    /// Fully resolved token endpoint
    pub token_url: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout for the token call
    pub timeout: Option<Duration>,
}

impl PasswordGrantConfig {
    /// Build the config, deriving the realm's token endpoint from the
    /// identity provider base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if `base_url` is not an absolute
    /// URL that can carry a path.
    pub fn new(
        base_url: &str,
        realm: &str,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            token_url: token_endpoint(base_url, realm)?,
            client_id: client_id.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
        })
    }

    /// Derive the config from the `IAM` settings section.
    pub fn from_iam(iam: &IamConfig) -> Result<Self> {
        Self::new(
            &iam.url,
            &iam.realm,
            iam.client_id.clone(),
            iam.username.clone(),
            iam.password.clone(),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for PasswordGrantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordGrantConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("username", &redact_if_sensitive("username", &self.username))
            .field("password", &redact_if_sensitive("password", &self.password))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn token_endpoint(base_url: &str, realm: &str) -> Result<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AuthError::InvalidConfig(format!("Invalid IAM URL '{}': {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| AuthError::InvalidConfig(format!("IAM URL cannot be a base: {}", base_url)))?
        .pop_if_empty()
        .extend(["realms", realm, "protocol", "openid-connect", "token"]);

    Ok(url.to_string())
}

/// Password grant client.
///
/// Sends exactly one token request per [`obtain_token`](TokenProvider::obtain_token)
/// call.
pub struct PasswordGrantClient {
    config: PasswordGrantConfig,
    http_client: Arc<dyn HttpClient>,
}

impl PasswordGrantClient {
    pub fn new(config: PasswordGrantConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn build_request(&self) -> Result<HttpRequest> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
            ("grant_type", "password"),
            ("scope", "openid"),
        ];

        let mut request = HttpRequest::new(HttpMethod::Post, self.config.token_url.clone())
            .form(&params)
            .map_err(|e| AuthError::InvalidConfig(format!("Failed to encode token request: {}", e)))?;

        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }
}

#[async_trait]
impl TokenProvider for PasswordGrantClient {
    #[instrument(
        skip(self),
        fields(
            client_id = %self.config.client_id,
            username = %redact_if_sensitive("username", &self.config.username)
        )
    )]
    async fn obtain_token(&self) -> Result<BearerToken> {
        debug!(url = %self.config.token_url, "Requesting access token");

        let request = self.build_request()?;
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            warn!(status = status, error = %error_body, "Token request rejected");

            return Err(AuthError::AuthenticationFailed {
                status,
                reason: error_body,
            });
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let expires_in = token_response.expires_in;

        let token = token_response
            .into_bearer()
            .ok_or(AuthError::MissingAccessToken)?;

        info!(expires_in = ?expires_in, "Obtained access token");
        Ok(token)
    }
}
