//! Custom Extractors
//!
//! Request body extractors whose rejections render through `AppError`.

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::shared::error::AppError;

/// JSON request body
///
/// Malformed JSON, missing or mistyped fields and a wrong content type all
/// become a 400 with the usual error body instead of axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
