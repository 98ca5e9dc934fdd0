//! DiscussionLogic - create, read, update and delete discussions.
//!
//! Every operation runs against the unit of work the logic was built with.
//! Failures never cross this boundary: each operation has an internal
//! `Result<_, DiscussionError>` form whose error is logged and collapsed into
//! `None`, `false` or an empty list.

use crate::domain::discussion::{Discussion, DiscussionError, NewDiscussion};
use crate::domain::foundation::DiscussionId;
use crate::ports::{DiscussionRepository, UnitOfWork};

/// Discussion operations over one request-scoped unit of work.
pub struct DiscussionLogic {
    uow: Box<dyn UnitOfWork>,
}

impl DiscussionLogic {
    pub fn new(uow: Box<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    fn discussions(&self) -> &dyn DiscussionRepository {
        self.uow.discussions()
    }

    /// Validates, inserts and commits a new discussion.
    ///
    /// Returns the stored discussion with its assigned id, or `None` if any
    /// step failed. Pending work is rolled back on failure.
    pub async fn create_discussion(&self, discussion: NewDiscussion) -> Option<Discussion> {
        match self.try_create(discussion).await {
            Ok(created) => {
                tracing::info!(discussion_id = %created.id(), "Discussion created");
                Some(created)
            }
            Err(err) => {
                log_failure("create", &err);
                self.rollback().await;
                None
            }
        }
    }

    /// Looks a discussion up by id. `None` when absent or on lookup failure.
    pub async fn get_discussion(&self, id: DiscussionId) -> Option<Discussion> {
        match self.try_get(id).await {
            Ok(found) => Some(found),
            Err(err) => {
                log_failure("get", &err);
                None
            }
        }
    }

    /// All discussions ordered by id. Empty on failure.
    pub async fn get_all_discussions(&self) -> Vec<Discussion> {
        match self.discussions().get_all().await {
            Ok(mut all) => {
                all.sort_by_key(Discussion::id);
                all
            }
            Err(err) => {
                log_failure("list", &DiscussionError::from(err));
                Vec::new()
            }
        }
    }

    /// Overwrites the text of the stored discussion with `discussion.id()`.
    ///
    /// Returns `false` when no such discussion exists, the new text is
    /// invalid, or persisting fails. Only the text is taken from the input.
    pub async fn update_discussion(&self, discussion: Discussion) -> bool {
        match self.try_update(&discussion).await {
            Ok(()) => {
                tracing::info!(discussion_id = %discussion.id(), "Discussion updated");
                true
            }
            Err(err) => {
                log_failure("update", &err);
                self.rollback().await;
                false
            }
        }
    }

    /// Deletes by `discussion.id()` without checking existence first.
    ///
    /// The delete takes effect immediately and is not part of the pending
    /// work of the unit of work. Deleting an unknown id succeeds.
    pub async fn delete_discussion(&self, discussion: Discussion) -> bool {
        let id = discussion.id();
        match self.discussions().delete_by_id(id).await {
            Ok(()) => {
                tracing::info!(discussion_id = %id, "Discussion deleted");
                true
            }
            Err(err) => {
                log_failure("delete", &DiscussionError::from(err));
                false
            }
        }
    }

    async fn try_create(&self, discussion: NewDiscussion) -> Result<Discussion, DiscussionError> {
        discussion.validate()?;
        let created = self.discussions().insert(discussion).await?;
        self.uow.commit().await?;
        Ok(created)
    }

    async fn try_get(&self, id: DiscussionId) -> Result<Discussion, DiscussionError> {
        self.discussions()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DiscussionError::not_found(id))
    }

    async fn try_update(&self, discussion: &Discussion) -> Result<(), DiscussionError> {
        // Read before write; the stored entity is the one mutated.
        let mut stored = self.try_get(discussion.id()).await?;
        stored.replace_text(discussion.text())?;
        self.discussions().update(&stored).await?;
        self.uow.commit().await?;
        Ok(())
    }

    async fn rollback(&self) {
        if let Err(err) = self.uow.rollback().await {
            tracing::error!(error = %err, "Rollback failed");
        }
    }
}

fn log_failure(operation: &'static str, err: &DiscussionError) {
    let code = err.code();
    match err {
        DiscussionError::NotFound(id) => {
            tracing::debug!(operation, %code, discussion_id = %id, "Discussion not found");
        }
        DiscussionError::Validation(cause) => {
            tracing::warn!(operation, %code, error = %cause, "Discussion rejected");
        }
        DiscussionError::Persistence(cause) => {
            tracing::warn!(operation, %code, error = %cause, "Discussion operation failed");
        }
    }
}
