//! Mock token validator for tests and local runs.
//!
//! # Example
//!
//! ```ignore
//! use discussion_service::adapters::auth::MockTokenValidator;
//!
//! let validator = MockTokenValidator::new().with_test_user("valid-token", "user-123");
//! let user = validator.validate("valid-token").await?;
//! assert_eq!(user.id.as_str(), "user-123");
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::TokenValidator;

/// Accepts a fixed set of tokens. Anything else is `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `token` as the given user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Accepts `token` as a user with the given id and a generated name.
    ///
    /// # Panics
    ///
    /// If `user_id` is empty.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let name = format!("Test User {}", user_id);
        let id = UserId::new(user_id).expect("test user id must not be empty");
        self.with_user(token, AuthenticatedUser::new(id, Some(name)))
    }

    /// Makes every validation fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .expect("MockTokenValidator: lock poisoned") = Some(error);
        self
    }

    /// Registers a token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .expect("MockTokenValidator: lock poisoned")
            .insert(token.into(), user);
    }

    /// Revokes a token.
    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .expect("MockTokenValidator: lock poisoned")
            .remove(token);
    }
}

#[async_trait]
impl TokenValidator for MockTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .expect("MockTokenValidator: lock poisoned")
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .expect("MockTokenValidator: lock poisoned")
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_returns_user() {
        let validator = MockTokenValidator::new().with_test_user("t", "user-1");
        let user = validator.validate("t").await.unwrap();

        assert_eq!(user.id.as_str(), "user-1");
        assert_eq!(user.display_name_or_id(), "Test User user-1");
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockTokenValidator::new();
        assert_eq!(validator.validate("nope").await.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn removed_token_is_invalid() {
        let validator = MockTokenValidator::new().with_test_user("t", "user-1");
        validator.remove_token("t");
        assert!(validator.validate("t").await.is_err());
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockTokenValidator::new()
            .with_test_user("t", "user-1")
            .with_error(AuthError::TokenExpired);
        assert_eq!(validator.validate("t").await.unwrap_err(), AuthError::TokenExpired);
    }
}
