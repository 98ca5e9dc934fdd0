//! Token validation configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Minimum shared-secret length accepted in production (HS256 key size).
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Bearer token validation configuration (issuer, audience, shared secret).
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Expected `iss` claim
    pub issuer: String,

    /// Expected `aud` claim
    pub audience: String,

    /// Shared HMAC secret used to verify token signatures
    pub secret_key: Secret<String>,

    /// Allowed clock skew in seconds when checking `exp`
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl JwtConfig {
    /// Validate token configuration
    ///
    /// In production, requires a secret of at least 32 bytes.
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_AUDIENCE"));
        }

        let secret_len = self.secret_key.expose_secret().len();
        if secret_len == 0 {
            return Err(ValidationError::MissingRequired("JWT_SECRET_KEY"));
        }
        if production && secret_len < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ValidationError::SecretTooShort);
        }

        Ok(())
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            secret_key: Secret::new(String::new()),
            leeway_secs: default_leeway(),
        }
    }
}

fn default_leeway() -> u64 {
    60
}
