//! In-memory unit of work.
//!
//! # Semantics
//!
//! - Ids come from a shared counter and are never reused, even when the
//!   insert that consumed one is rolled back
//! - Inserts and updates are staged per unit of work and applied to the
//!   shared store on `commit`
//! - A delete hits the shared store immediately when nothing is staged;
//!   otherwise it is staged as a removal alongside the other writes
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This adapter is meant
//! for tests and local runs; production uses the PostgreSQL adapter.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::domain::discussion::{Discussion, NewDiscussion};
use crate::domain::foundation::{DiscussionId, DomainError, ErrorCode};
use crate::ports::{DiscussionRepository, UnitOfWork, UnitOfWorkFactory};

/// Gateway operation that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Begin,
    Insert,
    GetById,
    GetAll,
    Update,
    DeleteById,
    Commit,
}

/// Staged writes; `None` marks a staged removal.
type Staged = BTreeMap<DiscussionId, Option<Discussion>>;

#[derive(Debug, Default)]
struct Shared {
    rows: RwLock<BTreeMap<DiscussionId, Discussion>>,
    next_id: AtomicI32,
    commits: AtomicUsize,
    faults: RwLock<HashSet<Fault>>,
}

impl Shared {
    fn check(&self, fault: Fault) -> Result<(), DomainError> {
        let armed = self
            .faults
            .read()
            .expect("InMemoryUnitOfWork: faults lock poisoned")
            .contains(&fault);
        if armed {
            return Err(DomainError::database(format!("Injected {:?} failure", fault)));
        }
        Ok(())
    }

    fn rows(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<DiscussionId, Discussion>> {
        self.rows
            .read()
            .expect("InMemoryUnitOfWork: rows lock poisoned")
    }

    fn rows_mut(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<DiscussionId, Discussion>> {
        self.rows
            .write()
            .expect("InMemoryUnitOfWork: rows lock poisoned")
    }
}

/// Factory handing out units of work over one shared in-memory store.
///
/// Cloning the factory shares the store.
///
/// # Example
///
/// ```ignore
/// let factory = InMemoryUnitOfWorkFactory::new();
/// let uow = factory.begin().await?;
/// uow.discussions().insert(NewDiscussion::new("hello")).await?;
/// uow.commit().await?;
/// assert_eq!(factory.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryUnitOfWorkFactory {
    shared: Arc<Shared>,
}

impl InMemoryUnitOfWorkFactory {
    /// Creates a factory over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with committed discussions.
    pub fn with_discussions(self, texts: &[&str]) -> Self {
        {
            let mut rows = self.shared.rows_mut();
            for text in texts {
                let id = DiscussionId::new(self.shared.next_id.fetch_add(1, Ordering::SeqCst) + 1);
                rows.insert(id, Discussion::new(id, *text));
            }
        }
        self
    }

    /// Makes every later call of the given operation fail.
    pub fn fail_on(&self, fault: Fault) {
        self.shared
            .faults
            .write()
            .expect("InMemoryUnitOfWork: faults lock poisoned")
            .insert(fault);
    }

    /// Returns to normal operation.
    pub fn clear_faults(&self) {
        self.shared
            .faults
            .write()
            .expect("InMemoryUnitOfWork: faults lock poisoned")
            .clear();
    }

    // === Test Helpers ===

    /// Returns a committed discussion.
    pub fn committed(&self, id: DiscussionId) -> Option<Discussion> {
        self.shared.rows().get(&id).cloned()
    }

    /// Number of committed discussions.
    pub fn len(&self) -> usize {
        self.shared.rows().len()
    }

    /// True when nothing is committed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful commits that applied at least one write.
    pub fn commit_count(&self) -> usize {
        self.shared.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryUnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        self.shared.check(Fault::Begin)?;
        Ok(Box::new(InMemoryUnitOfWork {
            shared: Arc::clone(&self.shared),
            pending: Mutex::new(Staged::new()),
        }))
    }
}

/// Unit of work staging writes in memory until commit.
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    shared: Arc<Shared>,
    pending: Mutex<Staged>,
}

impl InMemoryUnitOfWork {
    fn pending(&self) -> std::sync::MutexGuard<'_, Staged> {
        self.pending
            .lock()
            .expect("InMemoryUnitOfWork: pending lock poisoned")
    }
}

#[async_trait]
impl DiscussionRepository for InMemoryUnitOfWork {
    async fn insert(&self, discussion: NewDiscussion) -> Result<Discussion, DomainError> {
        self.shared.check(Fault::Insert)?;
        let id = DiscussionId::new(self.shared.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let discussion = discussion.into_discussion(id);
        self.pending().insert(id, Some(discussion.clone()));
        Ok(discussion)
    }

    async fn get_by_id(&self, id: DiscussionId) -> Result<Option<Discussion>, DomainError> {
        self.shared.check(Fault::GetById)?;
        if let Some(staged) = self.pending().get(&id) {
            return Ok(staged.clone());
        }
        Ok(self.shared.rows().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Discussion>, DomainError> {
        self.shared.check(Fault::GetAll)?;
        let mut merged = self.shared.rows().clone();
        apply(&mut merged, self.pending().clone());
        Ok(merged.into_values().collect())
    }

    async fn update(&self, discussion: &Discussion) -> Result<(), DomainError> {
        self.shared.check(Fault::Update)?;
        let id = discussion.id();
        let mut pending = self.pending();
        let exists = match pending.get(&id) {
            Some(staged) => staged.is_some(),
            None => self.shared.rows().contains_key(&id),
        };
        if !exists {
            return Err(DomainError::new(
                ErrorCode::DiscussionNotFound,
                format!("Discussion not found: {}", id),
            ));
        }
        pending.insert(id, Some(discussion.clone()));
        Ok(())
    }

    async fn delete_by_id(&self, id: DiscussionId) -> Result<(), DomainError> {
        self.shared.check(Fault::DeleteById)?;
        let mut pending = self.pending();
        if pending.is_empty() {
            self.shared.rows_mut().remove(&id);
        } else {
            pending.insert(id, None);
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn discussions(&self) -> &dyn DiscussionRepository {
        self
    }

    async fn commit(&self) -> Result<(), DomainError> {
        let staged = std::mem::take(&mut *self.pending());
        self.shared.check(Fault::Commit)?;
        if staged.is_empty() {
            return Ok(());
        }
        apply(&mut self.shared.rows_mut(), staged);
        self.shared.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self) -> Result<(), DomainError> {
        self.pending().clear();
        Ok(())
    }
}

fn apply(rows: &mut BTreeMap<DiscussionId, Discussion>, staged: Staged) {
    for (id, write) in staged {
        match write {
            Some(discussion) => rows.insert(id, discussion),
            None => rows.remove(&id),
        };
    }
}
