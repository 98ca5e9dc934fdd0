//! HS256 bearer token validator.
//!
//! Verifies tokens signed with the shared secret from [`JwtConfig`] and
//! checks issuer, audience and expiry (with the configured leeway) before
//! mapping the claims to an [`AuthenticatedUser`].

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::JwtConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::TokenValidator;

/// Claims read from an incoming token. `iss` and `aud` are checked by
/// `Validation` and not kept.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    unique_name: Option<String>,
}

/// Validates bearer tokens against a shared HMAC secret.
pub struct JwtTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenValidator")
            .field("issuer", &self.validation.iss)
            .field("audience", &self.validation.aud)
            .finish_non_exhaustive()
    }
}

impl JwtTokenValidator {
    /// Builds a validator from configuration.
    ///
    /// # Errors
    ///
    /// - `Misconfigured` if the secret, issuer or audience is empty
    pub fn new(config: &JwtConfig) -> Result<Self, AuthError> {
        let secret = config.secret_key.expose_secret();
        if secret.is_empty() {
            return Err(AuthError::misconfigured("empty signing secret"));
        }
        if config.issuer.is_empty() || config.audience.is_empty() {
            return Err(AuthError::misconfigured("issuer and audience are required"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.leeway = config.leeway_secs;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }
}

#[async_trait]
impl TokenValidator for JwtTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            }
        })?;
        let claims = data.claims;

        let user_id = UserId::new(claims.sub).map_err(|_| {
            tracing::warn!("Token has an empty subject");
            AuthError::InvalidToken
        })?;

        let mut user = AuthenticatedUser::new(user_id, claims.name.or(claims.unique_name));
        if let Some(expires_at) = Utc.timestamp_opt(claims.exp, 0).single() {
            user = user.with_expiry(expires_at);
        }
        tracing::debug!(user_id = %user.id, "Token accepted");
        Ok(user)
    }
}
