//! # Authentication Module
//!
//! Bearer token acquisition against an OpenID Connect identity provider.
//!
//! ## Overview
//!
//! The uploader authenticates once per run with the resource owner password
//! grant: the configured username and password are exchanged at the realm's
//! token endpoint for an access token, which is then attached to every
//! upload as `Authorization: Bearer <token>`.
//!
//! Tokens are not persisted or refreshed. A run either obtains one token up
//! front or aborts before touching the file server.
//!
//! ## Features
//!
//! - [`PasswordGrantClient`] performing the token request over the
//!   [`HttpClient`](bridge_traits::http::HttpClient) seam
//! - [`TokenProvider`] trait so the sync pipeline can be driven by fakes
//! - [`BearerToken`] newtype that never prints its secret

pub mod error;
pub mod password_grant;
pub mod types;

pub use error::{AuthError, Result};
pub use password_grant::{PasswordGrantClient, PasswordGrantConfig, TokenProvider};
pub use types::{BearerToken, TokenResponse};
