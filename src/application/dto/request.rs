//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidateUrl, ValidationError};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(rename = "confirmPassword", alias = "confirm_password")]
    pub confirm_password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

/// Create room request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    pub public: bool,
}

/// Room settings update; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// An empty string clears the description
    pub description: Option<String>,

    pub public: Option<bool>,
}

/// Add participant / promote moderator request
#[derive(Debug, Deserialize)]
pub struct RosterRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: i64,
}

/// JSON message body. Attachments arrive base64-encoded.
#[derive(Debug, Default, Deserialize)]
pub struct PostMessageRequest {
    pub content: Option<String>,

    #[serde(rename = "type")]
    pub message_type: Option<String>,

    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

/// Message list query parameters
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    /// Exclusive message id cursor
    pub after: Option<String>,
    pub limit: Option<i64>,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    /// An empty string clears the avatar
    #[validate(custom(function = "validate_avatar_url"))]
    pub avatar_url: Option<String>,
}

fn validate_avatar_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || url.validate_url() {
        return Ok(());
    }
    Err(ValidationError::new("url").with_message("Avatar must be a valid URL".into()))
}

/// Accept ids as JSON strings or numbers.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {}", text))),
    }
}
