//! PostgreSQL adapters - Database implementations of the persistence ports.
//!
//! - `PostgresUnitOfWorkFactory` - Opens request-scoped units of work
//! - `PostgresUnitOfWork` - Transactional discussion repository
//! - `connect_lazy` / `run_migrations` - Pool and schema bootstrap

mod pool;
mod unit_of_work;

pub use pool::{connect_lazy, run_migrations};
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};
