//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `DiscussionRepository` - Per-entity discussion operations
//! - `UnitOfWork` - Request-scoped grouping of pending writes with commit
//! - `UnitOfWorkFactory` - Opens one unit of work per request
//!
//! ## Authentication Ports
//!
//! - `TokenValidator` - Bearer token validation

mod discussion_repository;
mod token_validator;
mod unit_of_work;

pub use discussion_repository::DiscussionRepository;
pub use token_validator::TokenValidator;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
