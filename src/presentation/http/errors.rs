//! Service Error Translation
//!
//! Handlers are the only place service errors become `AppError`s, and so
//! HTTP statuses.

use crate::application::services::{
    AuthError, MessageError, ProfileError, RoomError, UploadError,
};
use crate::shared::error::AppError;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            AuthError::TokenExpired | AuthError::InvalidToken => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::PasswordMismatch
            | AuthError::WeakPassword
            | AuthError::InvalidEmail
            | AuthError::EmailExists => AppError::Validation(err.to_string()),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RoomError> for AppError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::NotFound | RoomError::UserNotFound => AppError::NotFound(err.to_string()),
            RoomError::InvalidName(_) | RoomError::NameTaken | RoomError::CannotRemoveAdmin => {
                AppError::Validation(err.to_string())
            }
            RoomError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Empty | UploadError::TooLarge { .. } => {
                AppError::Validation(err.to_string())
            }
            UploadError::StorageUnavailable(reason) => AppError::Upload(reason),
        }
    }
}

impl From<MessageError> for AppError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::RoomNotFound => AppError::NotFound(err.to_string()),
            MessageError::NotParticipant => AppError::Forbidden(err.to_string()),
            MessageError::Invalid(msg) => AppError::Validation(msg),
            MessageError::Upload(upload) => upload.into(),
            MessageError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Invalid(msg) => AppError::Validation(msg),
            ProfileError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
