//! Discussion domain module.
//!
//! The discussion is the only persisted entity of the service.

mod entity;
mod errors;

pub use entity::{Discussion, NewDiscussion, MAX_TEXT_LENGTH};
pub use errors::DiscussionError;
