use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error envelope shared by every handler.
///
/// Serializes as `{"error": <kind>, "details": <message>}`. Provider errors
/// carry the provider's raw response body so the caller sees exactly what the
/// upstream refused.
#[derive(Debug)]
pub enum APIError {
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Gone(String),
    Provider { status: u16, body: String },
    InternalServerError(String),
}

impl IntoResponse for APIError {
    fn into_response(self) -> Response {
        let (status, kind, details) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing or invalid credentials".to_string(),
            ),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            Self::Gone(msg) => (StatusCode::GONE, "gone", msg),
            Self::Provider { status, body } => (
                StatusCode::BAD_GATEWAY,
                "provider_error",
                format!("provider returned {}: {}", status, body),
            ),
            Self::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        (status, Json(json!({ "error": kind, "details": details }))).into_response()
    }
}
