//! Unit of work port.
//!
//! A unit of work groups the pending writes of one request and finalizes
//! them with a single `commit`. One is opened per request through a
//! [`UnitOfWorkFactory`] and handed to the logic layer explicitly.
//!
//! ```text
//! request → factory.begin() → UnitOfWork ─┬─ discussions().insert(..)
//!                                         ├─ discussions().update(..)
//!                                         └─ commit() / rollback()
//! ```

use async_trait::async_trait;

use super::DiscussionRepository;
use crate::domain::foundation::DomainError;

/// Request-scoped unit of work.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Repository for discussions, bound to this unit of work.
    fn discussions(&self) -> &dyn DiscussionRepository;

    /// Make all pending inserts and updates durable, atomically.
    ///
    /// Committing with nothing pending succeeds. After a commit the unit of
    /// work can be used for further writes.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the store refuses the commit; pending work is lost
    async fn commit(&self) -> Result<(), DomainError>;

    /// Discard all pending inserts and updates.
    async fn rollback(&self) -> Result<(), DomainError>;
}

/// Opens request-scoped units of work. Shared across requests.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// Open a fresh unit of work.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if no connection to the store can be obtained
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError>;
}
