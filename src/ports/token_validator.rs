//! Token validation port for bearer authentication.
//!
//! This port defines the contract for validating access tokens and extracting
//! the caller's identity. The HTTP middleware depends only on this trait, so
//! the signing scheme can change without touching request handling.
//!
//! # Contract
//!
//! Implementations must check:
//! - **Signature**: against the configured key
//! - **Issuer (iss)**: token must come from the expected issuer
//! - **Audience (aud)**: token must be intended for this service
//! - **Expiry (exp)**: token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    ///
    /// # Returns
    ///
    /// * `Ok(AuthenticatedUser)` - Token is valid
    /// * `Err(AuthError::InvalidToken)` - Malformed, bad signature, wrong iss/aud
    /// * `Err(AuthError::TokenExpired)` - Signature valid but expired
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
