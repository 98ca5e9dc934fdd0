//! In-memory persistence adapter.
//!
//! Implements the unit-of-work ports over a process-local store. Used by the
//! test suites and for running the HTTP surface without a database.

mod unit_of_work;

pub use unit_of_work::{Fault, InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};
