//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields")]
    InvalidFields(Vec<FieldError>),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors = None;

        let (status, code, kind, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, 10001, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 10002, "bad_request", msg),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, 10003, "authentication_failed", msg)
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, 10004, "forbidden", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, 10005, "conflict", msg),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, 10007, "validation_error", msg)
            }
            AppError::InvalidFields(fields) => {
                let message = fields
                    .first()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .unwrap_or_else(|| "Validation failed".into());
                errors = Some(fields);
                (StatusCode::BAD_REQUEST, 10007, "validation_error", message)
            }
            AppError::Upload(msg) => {
                tracing::warn!(reason = %msg, "Attachment upload failed");
                (
                    StatusCode::BAD_REQUEST,
                    10008,
                    "upload_failed",
                    "Failed to upload file".into(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    10000,
                    "internal_error",
                    "Internal server error".into(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    10000,
                    "internal_error",
                    "Internal server error".into(),
                )
            }
        };

        let body = ErrorResponse {
            code,
            error: kind,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
