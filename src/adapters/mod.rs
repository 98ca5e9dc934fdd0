//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - bearer token validators
//! - `http` - axum routes, handlers and middleware
//! - `memory` - in-process unit of work for tests and local runs
//! - `postgres` - sqlx-backed unit of work

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
