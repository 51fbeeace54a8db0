use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Identity provider rejected the credentials ({status}): {reason}")]
    AuthenticationFailed { status: u16, reason: String },

    #[error("Token endpoint response did not contain an access token")]
    MissingAccessToken,

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid identity provider configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
