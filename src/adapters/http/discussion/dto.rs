//! Request and response bodies for discussion endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::discussion::Discussion;

/// Body of `POST /api/discussions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscussionRequest {
    pub text: String,
}

/// Body of `PUT /api/discussions/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDiscussionRequest {
    pub text: String,
}

/// A discussion as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionResponse {
    pub id: i32,
    pub text: String,
}

impl From<Discussion> for DiscussionResponse {
    fn from(discussion: Discussion) -> Self {
        Self {
            id: discussion.id().as_i32(),
            text: discussion.text().to_string(),
        }
    }
}

/// Error body for every non-query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("Discussion not found: {}", id),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
        }
    }
}
