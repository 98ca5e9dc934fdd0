//! PostgreSQL implementation of the unit-of-work ports.
//!
//! Pending inserts and updates run inside a transaction that is begun lazily
//! on the first write and finished by `commit` or `rollback`. Dropping a
//! unit of work with an open transaction rolls it back.
//!
//! Reads and deletes go through the open transaction when there is one, so a
//! request sees its own pending writes. Without an open transaction a delete
//! runs on the pool and is durable on its own.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tokio::sync::Mutex;

use crate::domain::discussion::{Discussion, NewDiscussion};
use crate::domain::foundation::{DiscussionId, DomainError, ErrorCode};
use crate::ports::{DiscussionRepository, UnitOfWork, UnitOfWorkFactory};

type PgTransaction = Transaction<'static, Postgres>;

/// Opens one PostgreSQL unit of work per request over a shared pool.
#[derive(Clone)]
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    /// Creates a new PostgresUnitOfWorkFactory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        Ok(Box::new(PostgresUnitOfWork::new(self.pool.clone())))
    }
}

/// Request-scoped PostgreSQL unit of work.
pub struct PostgresUnitOfWork {
    pool: PgPool,
    tx: Mutex<Option<PgTransaction>>,
}

impl PostgresUnitOfWork {
    /// Creates a unit of work with no open transaction.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
        }
    }

    async fn open<'a>(
        &self,
        slot: &'a mut Option<PgTransaction>,
    ) -> Result<&'a mut PgTransaction, DomainError> {
        let tx = match slot.take() {
            Some(tx) => tx,
            None => self.pool.begin().await.map_err(|e| {
                DomainError::database(format!("Failed to begin transaction: {}", e))
            })?,
        };
        Ok(slot.insert(tx))
    }
}

#[async_trait]
impl DiscussionRepository for PostgresUnitOfWork {
    async fn insert(&self, discussion: NewDiscussion) -> Result<Discussion, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = self.open(&mut guard).await?;

        let row = sqlx::query("INSERT INTO discussions (text) VALUES ($1) RETURNING id, text")
            .bind(discussion.text())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to insert discussion: {}", e)))?;

        row_to_discussion(row)
    }

    async fn get_by_id(&self, id: DiscussionId) -> Result<Option<Discussion>, DomainError> {
        let mut guard = self.tx.lock().await;
        let row = match guard.as_mut() {
            Some(tx) => select_by_id(id).fetch_optional(&mut **tx).await,
            None => select_by_id(id).fetch_optional(&self.pool).await,
        }
        .map_err(|e| DomainError::database(format!("Failed to fetch discussion: {}", e)))?;

        row.map(row_to_discussion).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Discussion>, DomainError> {
        let mut guard = self.tx.lock().await;
        let rows = match guard.as_mut() {
            Some(tx) => select_all().fetch_all(&mut **tx).await,
            None => select_all().fetch_all(&self.pool).await,
        }
        .map_err(|e| DomainError::database(format!("Failed to fetch discussions: {}", e)))?;

        rows.into_iter().map(row_to_discussion).collect()
    }

    async fn update(&self, discussion: &Discussion) -> Result<(), DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = self.open(&mut guard).await?;

        let result = sqlx::query("UPDATE discussions SET text = $2 WHERE id = $1")
            .bind(discussion.id().as_i32())
            .bind(discussion.text())
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to update discussion: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DiscussionNotFound,
                format!("Discussion not found: {}", discussion.id()),
            ));
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: DiscussionId) -> Result<(), DomainError> {
        let mut guard = self.tx.lock().await;
        let delete = sqlx::query("DELETE FROM discussions WHERE id = $1").bind(id.as_i32());
        let result = match guard.as_mut() {
            Some(tx) => delete.execute(&mut **tx).await,
            None => delete.execute(&self.pool).await,
        }
        .map_err(|e| DomainError::database(format!("Failed to delete discussion: {}", e)))?;

        tracing::debug!(%id, rows = result.rows_affected(), "Deleted discussion");

        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn discussions(&self) -> &dyn DiscussionRepository {
        self
    }

    async fn commit(&self) -> Result<(), DomainError> {
        if let Some(tx) = self.tx.lock().await.take() {
            tx.commit().await.map_err(|e| {
                DomainError::database(format!("Failed to commit transaction: {}", e))
            })?;
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<(), DomainError> {
        if let Some(tx) = self.tx.lock().await.take() {
            tx.rollback().await.map_err(|e| {
                DomainError::database(format!("Failed to roll back transaction: {}", e))
            })?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn select_by_id<'q>(id: DiscussionId) -> Query<'q, Postgres, PgArguments> {
    sqlx::query("SELECT id, text FROM discussions WHERE id = $1").bind(id.as_i32())
}

fn select_all<'q>() -> Query<'q, Postgres, PgArguments> {
    sqlx::query("SELECT id, text FROM discussions ORDER BY id")
}

fn row_to_discussion(row: PgRow) -> Result<Discussion, DomainError> {
    let id: i32 = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;

    let text: String = row
        .try_get("text")
        .map_err(|e| DomainError::database(format!("Failed to get text: {}", e)))?;

    Ok(Discussion::new(DiscussionId::new(id), text))
}
