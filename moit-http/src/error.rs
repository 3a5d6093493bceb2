//! Error handling for moit-http
//!
//! Maps core errors onto HTTP status codes with `{"error": ...}` JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use moit_core::CoreError;
use serde_json::json;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Error bubbled up from moit-core
    Core(CoreError),

    /// Malformed request outside core validation
    BadRequest(String),

    /// Upload over the size limit
    PayloadTooLarge(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl AppError {
    /// Get the status code and response body for this error
    fn status_and_body(&self) -> (StatusCode, serde_json::Value) {
        match self {
            Self::Core(err) => match err {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, json!({ "error": msg }))
                }
                CoreError::Credentials { remaining_attempts } => {
                    let mut body = json!({ "error": err.to_string() });
                    if let Some(remaining) = remaining_attempts {
                        body["remaining_attempts"] = json!(remaining);
                    }
                    (StatusCode::UNAUTHORIZED, body)
                }
                CoreError::AccountLocked => {
                    (StatusCode::FORBIDDEN, json!({ "error": err.to_string() }))
                }
                CoreError::Forbidden => {
                    (StatusCode::FORBIDDEN, json!({ "error": err.to_string() }))
                }
                CoreError::Duplicate { field } => (
                    StatusCode::CONFLICT,
                    json!({ "error": err.to_string(), "field": field }),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
                CoreError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
                }
                CoreError::Agent(msg) => {
                    tracing::error!("agent call failed: {msg}");
                    (StatusCode::BAD_GATEWAY, json!({ "error": msg }))
                }
                CoreError::Storage(msg) | CoreError::Object(msg) | CoreError::Internal(msg) => {
                    tracing::error!("internal error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "error": "internal server error" }),
                    )
                }
            },
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Self::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg }))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
