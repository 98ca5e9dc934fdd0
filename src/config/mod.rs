//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file when
//! present) using the `config` and `dotenvy` crates. Variables carry the
//! `DISCUSSION_SERVICE` prefix and nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use discussion_service::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod server;

pub use auth::{JwtConfig, MIN_PRODUCTION_SECRET_BYTES};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "DISCUSSION_SERVICE";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Bearer token validation
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `DISCUSSION_SERVICE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DISCUSSION_SERVICE__DATABASE__URL=...` -> `database.url = ...`
    /// - `DISCUSSION_SERVICE__JWT__SECRET_KEY=...` -> `jwt.secret_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate(self.is_production())?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DISCUSSION_SERVICE__DATABASE__URL",
        "DISCUSSION_SERVICE__JWT__ISSUER",
        "DISCUSSION_SERVICE__JWT__AUDIENCE",
        "DISCUSSION_SERVICE__JWT__SECRET_KEY",
        "DISCUSSION_SERVICE__JWT__LEEWAY_SECS",
        "DISCUSSION_SERVICE__SERVER__PORT",
        "DISCUSSION_SERVICE__SERVER__ENVIRONMENT",
        "DISCUSSION_SERVICE__SERVER__LOG_FORMAT",
    ];

    fn set_minimal_env() {
        env::set_var(
            "DISCUSSION_SERVICE__DATABASE__URL",
            "postgresql://test@localhost/discussions",
        );
        env::set_var("DISCUSSION_SERVICE__JWT__ISSUER", "https://issuer.example.com");
        env::set_var("DISCUSSION_SERVICE__JWT__AUDIENCE", "discussion-api");
        env::set_var("DISCUSSION_SERVICE__JWT__SECRET_KEY", "dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let result = load_with(&[]);

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/discussions");
        assert_eq!(config.jwt.issuer, "https://issuer.example.com");
        assert_eq!(config.jwt.audience, "discussion-api");
        assert_eq!(config.jwt.secret_key.expose_secret(), "dev-secret");
        assert_eq!(config.jwt.leeway_secs, 60);
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("DISCUSSION_SERVICE__SERVER__PORT", "3000"),
            ("DISCUSSION_SERVICE__SERVER__LOG_FORMAT", "json"),
            ("DISCUSSION_SERVICE__JWT__LEEWAY_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.jwt.leeway_secs, 5);
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("DISCUSSION_SERVICE__SERVER__ENVIRONMENT", "production")])
            .unwrap();

        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::SecretTooShort)
        ));
    }

    #[test]
    fn test_missing_jwt_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var(
            "DISCUSSION_SERVICE__DATABASE__URL",
            "postgresql://test@localhost/discussions",
        );
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
