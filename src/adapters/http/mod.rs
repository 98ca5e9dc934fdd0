//! HTTP adapter - REST endpoints and the structured query endpoint.

pub mod discussion;
pub mod middleware;
mod router;

pub use discussion::DiscussionAppState;
pub use router::{build_router, health};
