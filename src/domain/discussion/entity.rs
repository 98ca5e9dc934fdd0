//! Discussion entity.
//!
//! A discussion is an identifier plus a mutable text payload. The identifier
//! comes from the persistence layer; only the text changes over time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DiscussionId, ValidationError};

/// Maximum length for discussion text, in characters.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// A persisted discussion.
///
/// # Invariants
///
/// - `id` was assigned by the persistence layer and never changes
/// - `text` is the only mutable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    id: DiscussionId,
    text: String,
}

impl Discussion {
    /// Reconstitute a discussion from persistence (no validation).
    pub fn new(id: DiscussionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Returns the discussion ID.
    pub fn id(&self) -> DiscussionId {
        self.id
    }

    /// Returns the discussion text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, leaving the identifier untouched.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the text is blank
    /// - `TooLong` if the text exceeds [`MAX_TEXT_LENGTH`]
    pub fn replace_text(&mut self, text: impl Into<String>) -> Result<(), ValidationError> {
        let text = text.into();
        validate_text(&text)?;
        self.text = text;
        Ok(())
    }
}

/// Input for creating a discussion; has no identity until inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDiscussion {
    text: String,
}

impl NewDiscussion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check the text against the discussion rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.text)
    }

    /// Attach the identifier assigned by the persistence layer.
    pub fn into_discussion(self, id: DiscussionId) -> Discussion {
        Discussion::new(id, self.text)
    }
}

fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::empty_field("text"));
    }
    let length = text.chars().count();
    if length > MAX_TEXT_LENGTH {
        return Err(ValidationError::too_long("text", MAX_TEXT_LENGTH, length));
    }
    Ok(())
}
