//! Integration tests for the discussion HTTP surface.
//!
//! The full router runs over the in-memory unit of work and a mock token
//! validator, driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use discussion_service::adapters::auth::MockTokenValidator;
use discussion_service::adapters::http::build_router;
use discussion_service::adapters::memory::{Fault, InMemoryUnitOfWorkFactory};
use discussion_service::config::ServerConfig;
use discussion_service::domain::foundation::DiscussionId;

// =============================================================================
// Test Infrastructure
// =============================================================================

const TOKEN: &str = "test-token";

fn app(factory: &InMemoryUnitOfWorkFactory) -> Router {
    let validator = MockTokenValidator::new().with_test_user(TOKEN, "user-1");
    build_router(
        Arc::new(factory.clone()),
        Arc::new(validator),
        &ServerConfig::default(),
    )
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(factory: &InMemoryUnitOfWorkFactory, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(factory).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// =============================================================================
// Health and authentication
// =============================================================================

#[tokio::test]
async fn health_needs_no_token() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&factory, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn api_without_token_is_401() {
    let factory = InMemoryUnitOfWorkFactory::new().with_discussions(&["a"]);
    let request = Request::builder()
        .uri("/api/discussions")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&factory, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn api_with_unknown_token_is_401() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let request = Request::builder()
        .uri("/api/discussions")
        .header(header::AUTHORIZATION, "Bearer someone-else")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&factory, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn full_lifecycle_over_http() {
    let factory = InMemoryUnitOfWorkFactory::new();

    let (status, created) = send(
        &factory,
        request(Method::POST, "/api/discussions", Some(json!({"text": "hello"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": 1, "text": "hello"}));

    let (status, listed) = send(&factory, request(Method::GET, "/api/discussions", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([{"id": 1, "text": "hello"}]));

    let (status, _) = send(
        &factory,
        request(Method::PUT, "/api/discussions/1", Some(json!({"text": "world"}))),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, fetched) = send(&factory, request(Method::GET, "/api/discussions/1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json!({"id": 1, "text": "world"}));

    let (status, _) = send(&factory, request(Method::DELETE, "/api/discussions/1", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&factory, request(Method::GET, "/api/discussions/1", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_with_blank_text_is_400() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let (status, body) = send(
        &factory,
        request(Method::POST, "/api/discussions", Some(json!({"text": "  "}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(factory.is_empty());
}

#[tokio::test]
async fn create_is_400_and_retains_nothing_when_commit_fails() {
    let factory = InMemoryUnitOfWorkFactory::new();
    factory.fail_on(Fault::Commit);

    let (status, _) = send(
        &factory,
        request(Method::POST, "/api/discussions", Some(json!({"text": "hello"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    factory.clear_faults();
    let (_, listed) = send(&factory, request(Method::GET, "/api/discussions", None)).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn update_of_unknown_id_is_400() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let (status, _) = send(
        &factory,
        request(Method::PUT, "/api/discussions/5", Some(json!({"text": "x"}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(factory.committed(DiscussionId::new(5)).is_none());
}

#[tokio::test]
async fn delete_of_unknown_id_is_204() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let (status, _) = send(&factory, request(Method::DELETE, "/api/discussions/99", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let (status, body) = send(&factory, request(Method::GET, "/api/discussions/abc", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid discussion ID");
}

#[tokio::test]
async fn list_is_empty_when_retrieval_fails() {
    let factory = InMemoryUnitOfWorkFactory::new().with_discussions(&["a", "b"]);
    factory.fail_on(Fault::GetAll);

    let (status, listed) = send(&factory, request(Method::GET, "/api/discussions", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn unavailable_store_is_503() {
    let factory = InMemoryUnitOfWorkFactory::new();
    factory.fail_on(Fault::Begin);

    let (status, body) = send(&factory, request(Method::GET, "/api/discussions", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

// =============================================================================
// Structured query
// =============================================================================

#[tokio::test]
async fn query_single_discussion_with_field_selection() {
    let factory = InMemoryUnitOfWorkFactory::new().with_discussions(&["hello"]);
    let (status, body) = send(
        &factory,
        request(
            Method::POST,
            "/api/query",
            Some(json!({"query": {"discussion": {"id": 1}}, "fields": ["text"]})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"discussion": {"text": "hello"}}}));
}

#[tokio::test]
async fn query_all_discussions() {
    let factory = InMemoryUnitOfWorkFactory::new().with_discussions(&["a", "b"]);
    let (status, body) = send(
        &factory,
        request(Method::POST, "/api/query", Some(json!({"query": {"discussions": {}}}))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": {"discussions": [{"id": 1, "text": "a"}, {"id": 2, "text": "b"}]}})
    );
}

#[tokio::test]
async fn query_with_unknown_field_is_400_with_errors() {
    let factory = InMemoryUnitOfWorkFactory::new().with_discussions(&["a"]);
    let (status, body) = send(
        &factory,
        request(
            Method::POST,
            "/api/query",
            Some(json!({"query": {"discussions": {}}, "fields": ["author"]})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("data").is_none());
    assert_eq!(
        body["errors"][0]["message"],
        "Cannot query field 'author' on type 'Discussion'"
    );
}

#[tokio::test]
async fn malformed_create_and_update_bodies_are_json_400() {
    let factory = InMemoryUnitOfWorkFactory::new().with_discussions(&["a"]);

    for (method, uri, raw) in [
        (Method::POST, "/api/discussions", "{\"text\": "),
        (Method::POST, "/api/discussions", "{\"title\": \"x\"}"),
        (Method::PUT, "/api/discussions/1", "not json"),
    ] {
        let request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();
        let (status, body) = send(&factory, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {} {:?}", method, uri, raw);
        assert_eq!(body["code"], "BAD_REQUEST");
    }
    let stored = factory.committed(DiscussionId::new(1)).unwrap();
    assert_eq!(stored.text(), "a");
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let request = Request::builder()
        .uri("/api/discussions")
        .header(header::AUTHORIZATION, format!("bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&factory, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn malformed_query_document_is_400_with_errors() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let (status, body) = send(
        &factory,
        request(Method::POST, "/api/query", Some(json!({"query": {"users": {}}}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());
}
