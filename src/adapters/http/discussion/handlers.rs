//! HTTP handlers for discussion endpoints.
//!
//! Each request opens its own unit of work and builds a `DiscussionLogic`
//! over it.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{DiscussionLogic, DiscussionQueryResolver, QueryDocument, QueryResponse};
use crate::domain::discussion::{Discussion, NewDiscussion};
use crate::domain::foundation::DiscussionId;
use crate::ports::UnitOfWorkFactory;

use super::dto::{
    CreateDiscussionRequest, DiscussionResponse, ErrorResponse, UpdateDiscussionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DiscussionAppState {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl DiscussionAppState {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }

    async fn logic(&self) -> Result<DiscussionLogic, Response> {
        match self.uow_factory.begin().await {
            Ok(uow) => Ok(DiscussionLogic::new(uow)),
            Err(err) => {
                tracing::error!(error = %err, "Could not open unit of work");
                Err((
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::unavailable("Storage unavailable")),
                )
                    .into_response())
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<DiscussionId, Response> {
    raw.parse::<DiscussionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid discussion ID")),
        )
            .into_response()
    })
}

/// Unwraps a JSON body, answering a malformed one with a JSON 400.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(rejection.body_text())),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/discussions - List all discussions
pub async fn list_discussions(
    State(state): State<DiscussionAppState>,
    RequireAuth(_user): RequireAuth,
) -> Response {
    let logic = match state.logic().await {
        Ok(logic) => logic,
        Err(response) => return response,
    };

    let discussions: Vec<DiscussionResponse> = logic
        .get_all_discussions()
        .await
        .into_iter()
        .map(DiscussionResponse::from)
        .collect();
    (StatusCode::OK, Json(discussions)).into_response()
}

/// GET /api/discussions/:id - Get one discussion
pub async fn get_discussion(
    State(state): State<DiscussionAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let discussion_id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let logic = match state.logic().await {
        Ok(logic) => logic,
        Err(response) => return response,
    };

    match logic.get_discussion(discussion_id).await {
        Some(discussion) => {
            (StatusCode::OK, Json(DiscussionResponse::from(discussion))).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(&id))).into_response(),
    }
}

/// POST /api/discussions - Create a discussion
pub async fn create_discussion(
    State(state): State<DiscussionAppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<CreateDiscussionRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let logic = match state.logic().await {
        Ok(logic) => logic,
        Err(response) => return response,
    };

    match logic.create_discussion(NewDiscussion::new(req.text)).await {
        Some(discussion) => {
            tracing::debug!(user_id = %user.id, discussion_id = %discussion.id(), "Created via HTTP");
            (StatusCode::CREATED, Json(DiscussionResponse::from(discussion))).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Discussion could not be created")),
        )
            .into_response(),
    }
}

/// PUT /api/discussions/:id - Replace the text of a discussion
pub async fn update_discussion(
    State(state): State<DiscussionAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
    body: Result<Json<UpdateDiscussionRequest>, JsonRejection>,
) -> Response {
    let discussion_id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match json_body(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    let logic = match state.logic().await {
        Ok(logic) => logic,
        Err(response) => return response,
    };

    if logic
        .update_discussion(Discussion::new(discussion_id, req.text))
        .await
    {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Discussion could not be updated")),
        )
            .into_response()
    }
}

/// DELETE /api/discussions/:id - Delete a discussion
pub async fn delete_discussion(
    State(state): State<DiscussionAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let discussion_id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let logic = match state.logic().await {
        Ok(logic) => logic,
        Err(response) => return response,
    };

    // Only the id is used for deletion.
    if logic
        .delete_discussion(Discussion::new(discussion_id, String::new()))
        .await
    {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Discussion could not be deleted")),
        )
            .into_response()
    }
}

/// POST /api/query - Structured read-only query
pub async fn query_discussions(
    State(state): State<DiscussionAppState>,
    RequireAuth(_user): RequireAuth,
    body: Result<Json<QueryDocument>, JsonRejection>,
) -> Response {
    let document = match body {
        Ok(Json(document)) => document,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(QueryResponse::error(rejection.body_text())),
            )
                .into_response()
        }
    };
    let logic = match state.logic().await {
        Ok(logic) => logic,
        Err(response) => return response,
    };

    let response = QueryResponse::from(DiscussionQueryResolver::new(&logic).resolve(&document).await);
    let status = if response.is_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_numeric() {
        let response = parse_id("abc").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_id_accepts_number() {
        assert_eq!(parse_id("12").ok(), Some(DiscussionId::new(12)));
    }

    #[tokio::test]
    async fn malformed_json_body_is_json_400() {
        use axum::extract::FromRequest;

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/discussions")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{\"text\": "))
            .unwrap();
        let body = Json::<CreateDiscussionRequest>::from_request(request, &()).await;

        let response = json_body(body).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.code, "BAD_REQUEST");
    }

    #[test]
    fn app_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<DiscussionAppState>();
    }
}
