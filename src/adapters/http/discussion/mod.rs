//! HTTP adapter for discussion endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateDiscussionRequest, DiscussionResponse, ErrorResponse, UpdateDiscussionRequest};
pub use handlers::DiscussionAppState;
pub use routes::{discussion_routes, query_routes};
