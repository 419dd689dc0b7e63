//! Caller identity middleware
//!
//! Every mutating operation is attributed to a user id for the stock and
//! payment ledgers. Callers identify themselves with an opaque UUID in the
//! `x-user-id` header; session handling is the API gateway's concern.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::error::{ErrorDetail, ErrorResponse};

/// Header carrying the opaque caller id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the caller, extracted from the request headers
#[derive(Clone, Debug)]
pub struct CallerIdentity {
    pub user_id: Uuid,
}

/// Middleware that requires a valid `x-user-id` header on protected routes
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok());

    let user_id = match header.map(Uuid::parse_str) {
        Some(Ok(id)) => id,
        Some(Err(_)) => {
            return unauthorized_response("Invalid x-user-id header");
        }
        None => {
            return unauthorized_response("Missing x-user-id header");
        }
    };

    request.extensions_mut().insert(CallerIdentity { user_id });

    next.run(request).await
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for the caller identity
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub CallerIdentity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Caller identity required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
