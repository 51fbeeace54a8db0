use serde::Deserialize;
use std::fmt;

/// Access token attached to file server requests.
///
/// The inner value is only reachable through [`BearerToken::as_str`];
/// `Debug` and `Display` never print it.
///
/// # Examples
///
/// ```
/// use core_auth::BearerToken;
///
/// let token = BearerToken::new("eyJhbGciOiJSUzI1NiJ9");
/// assert_eq!(token.as_str(), "eyJhbGciOiJSUzI1NiJ9");
/// assert_eq!(format!("{:?}", token), "BearerToken([REDACTED])");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for the `Authorization` header
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Successful body of an OpenID Connect token endpoint.
///
/// Only `access_token` is used; the remaining fields are kept for logging.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Extract a usable bearer token, treating an empty string as absent.
    pub fn into_bearer(self) -> Option<BearerToken> {
        self.access_token
            .filter(|token| !token.trim().is_empty())
            .map(BearerToken::new)
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
