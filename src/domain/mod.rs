//! Domain layer containing business types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, auth types, errors)
//! - `discussion` - The discussion entity and its rules

pub mod discussion;
pub mod foundation;
