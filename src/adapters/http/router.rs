//! Assembles the full HTTP application.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::discussion::{discussion_routes, query_routes, DiscussionAppState};
use super::middleware::{auth_middleware, AuthState};
use crate::config::ServerConfig;
use crate::ports::{TokenValidator, UnitOfWorkFactory};

/// GET /health - liveness probe, no authentication
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

/// Builds the router: `/health` plus the authenticated `/api` tree.
pub fn build_router(
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    validator: Arc<dyn TokenValidator>,
    server: &ServerConfig,
) -> Router {
    let state = DiscussionAppState::new(uow_factory);
    let auth_state: AuthState = validator;

    let api = Router::new()
        .nest("/discussions", discussion_routes(state.clone()))
        .merge(query_routes(state))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}
