//! HTTP routes for discussion endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_discussion, delete_discussion, get_discussion, list_discussions, query_discussions,
    update_discussion, DiscussionAppState,
};

/// Discussion CRUD routes, meant to be nested under `/api/discussions`.
pub fn discussion_routes(state: DiscussionAppState) -> Router {
    Router::new()
        .route("/", get(list_discussions).post(create_discussion))
        .route(
            "/:id",
            get(get_discussion)
                .put(update_discussion)
                .delete(delete_discussion),
        )
        .with_state(state)
}

/// Structured query route, meant to be nested under `/api`.
pub fn query_routes(state: DiscussionAppState) -> Router {
    Router::new()
        .route("/query", post(query_discussions))
        .with_state(state)
}
