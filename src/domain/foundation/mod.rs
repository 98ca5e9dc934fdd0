//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, authentication types and error types
//! that form the vocabulary of the discussion service.

mod auth;
mod errors;
mod ids;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DiscussionId, UserId};
