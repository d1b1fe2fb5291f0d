//! Authentication types for the domain layer.
//!
//! A `Session` is owned by the hosted backend's auth subsystem. The data
//! access layer only checks that one exists; it never inspects the token
//! beyond handing it back to the client that issued it.

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use super::Timestamp;

/// Identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// The unique user identifier from the auth provider.
    pub id: String,

    /// User's email address, when the provider reports one.
    pub email: Option<String>,
}

impl SessionUser {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: Secret<String>,
    /// The signed-in user.
    pub user: SessionUser,
    /// When the access token stops being accepted, if known.
    pub expires_at: Option<Timestamp>,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        user: SessionUser,
        expires_at: Option<Timestamp>,
    ) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            user,
            expires_at,
        }
    }

    /// Exposes the bearer token for the adapter that sends it.
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Returns true once `expires_at` has passed.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.map(|exp| !exp.is_after(&now)).unwrap_or(false)
    }
}

/// Authentication errors reported by the hosted backend's auth subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email/password pair rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The token is missing, malformed, or no longer accepted.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials | AuthError::InvalidToken)
    }
}
