//! Error types for the bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad caller input: missing required field or inconsistent page counts.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record for the given id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected server-side condition, e.g. an append that cannot be
    /// confirmed. Surfaced as a 500 "error" response, never retried.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body.
///
/// `status` is `"fail"` for expected caller-correctable conditions and
/// `"error"` for unexpected server-side ones.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "fail", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "fail", msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "error", msg)
            }
        };

        let body = Json(ErrorResponse {
            status: status.to_string(),
            message,
        });

        (code, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
