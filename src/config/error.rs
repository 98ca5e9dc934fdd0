//! Configuration error types

use thiserror::Error;

/// Loading failed before any value could be checked
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// A loaded value is unusable
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid host address")]
    InvalidHost,

    #[error("Request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Database URL must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,

    #[error("Pool bounds min={min} max={max} must satisfy min <= max, 1 <= max <= 100")]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("JWT secret key must be at least 32 bytes in production")]
    SecretTooShort,
}
