//! Authentication types for the domain layer.
//!
//! These types represent the caller identified by a validated bearer token.
//! They carry no token-format details; the `TokenValidator` port populates
//! them from whatever claims its implementation understands.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::UserId;

/// Caller identity extracted from a validated bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The subject of the token.
    pub id: UserId,

    /// Display name if the token carried one (`name` or `unique_name`).
    pub display_name: Option<String>,

    /// When the presented token stops being valid.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, display_name: Option<String>) -> Self {
        Self {
            id,
            display_name,
            expires_at: None,
        }
    }

    /// Records the expiry of the token this identity came from.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns the display name, or the user id as fallback.
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is malformed, has a bad signature, or wrong issuer/audience.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The validator itself cannot operate (for example, no signing key).
    #[error("Token validation misconfigured: {0}")]
    Misconfigured(String),
}

impl AuthError {
    /// Creates a misconfiguration error with a message.
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::Misconfigured(message.into())
    }

    /// True when the caller should present a new token (answered with 401).
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
