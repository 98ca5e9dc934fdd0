//! Discussion-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DiscussionId, DomainError, ErrorCode, ValidationError};

/// Why a discussion operation failed.
///
/// Used inside the logic layer and logged; callers of the logic layer only
/// see the coarse success/failure shape.
#[derive(Debug, Clone, Error)]
pub enum DiscussionError {
    /// No discussion with this id exists.
    #[error("Discussion not found: {0}")]
    NotFound(DiscussionId),

    /// The input violates the discussion rules.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The persistence gateway failed.
    #[error("Persistence failed: {0}")]
    Persistence(DomainError),
}

impl DiscussionError {
    pub fn not_found(id: DiscussionId) -> Self {
        DiscussionError::NotFound(id)
    }

    /// Error code reported alongside the failure in logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            DiscussionError::NotFound(_) => ErrorCode::DiscussionNotFound,
            DiscussionError::Validation(_) => ErrorCode::ValidationFailed,
            DiscussionError::Persistence(err) => err.code,
        }
    }
}

impl From<DomainError> for DiscussionError {
    fn from(err: DomainError) -> Self {
        DiscussionError::Persistence(err)
    }
}
