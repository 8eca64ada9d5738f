//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::RoomDetail;
use crate::domain::{ChatRoom, Message, User, UserProfile};

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
    pub user_id: String,
    pub access: String,
    pub refresh: String,
}

impl LoginResponse {
    pub fn new(user: User, access: String, refresh: String) -> Self {
        Self {
            message: "Login successful".to_string(),
            username: user.username,
            user_id: user.id.to_string(),
            access,
            refresh,
        }
    }
}

/// Refreshed access token
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub chat_room_id: String,
    pub sender_id: String,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub timestamp: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            chat_room_id: message.chat_room_id.to_string(),
            sender_id: message.sender_id.to_string(),
            content: message.content,
            file_url: message.file_url,
            file_type: message.file_type,
            message_type: message.message_type.as_str().to_string(),
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

/// Room response
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub public: bool,
    pub admin_id: Option<String>,
    pub participants: Vec<String>,
    pub moderators: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChatRoom> for RoomResponse {
    fn from(room: ChatRoom) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name,
            description: room.description,
            public: room.is_public,
            admin_id: room.admin_id.map(|id| id.to_string()),
            participants: room.participant_ids.iter().map(i64::to_string).collect(),
            moderators: room.moderator_ids.iter().map(i64::to_string).collect(),
            created_at: room.created_at.to_rfc3339(),
            updated_at: room.updated_at.to_rfc3339(),
        }
    }
}

/// Room detail: the room plus its ordered messages
#[derive(Debug, Serialize)]
pub struct RoomDetailResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub messages: Vec<MessageResponse>,
}

impl From<RoomDetail> for RoomDetailResponse {
    fn from(detail: RoomDetail) -> Self {
        Self {
            room: detail.room.into(),
            messages: detail.messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}
