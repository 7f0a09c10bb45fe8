//! API error types and response formatting.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brochure_auth::{PasswordError, SessionError, Unauthorized};
use serde::Serialize;

use super::store::BlobError;

/// API error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed. The cause is never part of the response.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request parameters or body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Blob store error.
    #[error("store error: {0}")]
    Store(#[from] BlobError),

    /// Stored password hash is unusable.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Session token could not be issued.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Background task failed.
    #[error("task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<Unauthorized> for ApiError {
    fn from(_: Unauthorized) -> Self {
        Self::Unauthorized
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Store(BlobError::InvalidKey(key)) => {
                (StatusCode::BAD_REQUEST, format!("Invalid id: {key}"))
            }
            other => {
                tracing::error!(error = %other, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Store(BlobError::InvalidKey("../x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Store(BlobError::Io(std::io::Error::other("disk"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_unauthorized_conversion() {
        assert!(matches!(ApiError::from(Unauthorized), ApiError::Unauthorized));
    }
}
