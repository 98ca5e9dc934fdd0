//! Discussion repository port.
//!
//! Per-entity operations of the persistence gateway. A repository is always
//! reached through a [`UnitOfWork`](super::UnitOfWork), which decides when
//! pending inserts and updates become durable.
//!
//! # Design
//!
//! - **Pending writes**: `insert` and `update` are staged until the unit of
//!   work commits
//! - **Immediate deletes**: `delete_by_id` takes effect on its own when the
//!   unit of work holds no pending writes; otherwise it joins them
//! - **Read-your-writes**: reads made through the same unit of work observe
//!   its pending writes

use crate::domain::discussion::{Discussion, NewDiscussion};
use crate::domain::foundation::{DiscussionId, DomainError};
use async_trait::async_trait;

/// Repository port for Discussion persistence.
#[async_trait]
pub trait DiscussionRepository: Send + Sync {
    /// Insert a new discussion and return it with its assigned id.
    ///
    /// The row is pending until the owning unit of work commits.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, discussion: NewDiscussion) -> Result<Discussion, DomainError>;

    /// Find a discussion by its id.
    ///
    /// Returns `None` if not found.
    async fn get_by_id(&self, id: DiscussionId) -> Result<Option<Discussion>, DomainError>;

    /// List every discussion, ordered by id ascending.
    async fn get_all(&self) -> Result<Vec<Discussion>, DomainError>;

    /// Overwrite an existing discussion.
    ///
    /// # Errors
    ///
    /// - `DiscussionNotFound` if no row has this id
    /// - `DatabaseError` on persistence failure
    async fn update(&self, discussion: &Discussion) -> Result<(), DomainError>;

    /// Delete a discussion by id.
    ///
    /// With no pending writes in the owning unit of work the delete is durable
    /// at once, without a commit. With pending writes it joins them, so it
    /// also removes a row inserted by the same unit of work and becomes
    /// durable on `commit` or is discarded by `rollback`.
    ///
    /// Deleting an id that does not exist is not an error.
    async fn delete_by_id(&self, id: DiscussionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn discussion_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DiscussionRepository) {}
    }
}
