//! Bearer authentication middleware and extractor.
//!
//! ```text
//! Request → auth_middleware ─┬─ no/invalid token → 401
//!                            └─ valid → AuthenticatedUser in extensions → handler
//! ```
//!
//! The middleware depends only on the `TokenValidator` port. The scheme name
//! in the `Authorization` header is matched case-insensitively.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser, ErrorCode};
use crate::ports::TokenValidator;

/// Auth middleware state.
pub type AuthState = Arc<dyn TokenValidator>;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.trim_start().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid bearer token.
///
/// On success the caller's `AuthenticatedUser` is inserted into the request
/// extensions for [`RequireAuth`] to pick up.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return AuthRejection::Unauthenticated.into_response();
    };

    match validator.validate(token).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => AuthRejection::Invalid(err).into_response(),
    }
}

/// Extractor for the authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Why a request was refused authentication.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No bearer token was presented.
    Unauthenticated,
    /// The presented token did not validate.
    Invalid(AuthError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Authentication required",
            ),
            AuthRejection::Invalid(err) if err.requires_reauthentication() => {
                let message = match err {
                    AuthError::TokenExpired => "Token expired",
                    _ => "Invalid token",
                };
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
            }
            AuthRejection::Invalid(err) => {
                tracing::error!(error = %err, "Token validator unusable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    "Authentication unavailable",
                )
            }
        };

        let mut response = (
            status,
            Json(serde_json::json!({
                "code": code.to_string(),
                "message": message,
            })),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
