//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maximum text content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 4000;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Message types matching the `type` column.
///
/// Database definition:
/// ```sql
/// type VARCHAR(5) NOT NULL DEFAULT 'text'
///     CHECK (type IN ('text', 'image', 'file'))
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Plain text message
    #[default]
    Text,
    /// Image attachment
    Image,
    /// Any other attachment
    File,
}

impl MessageType {
    /// Parse the database/wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    /// Classify an uploaded attachment by its MIME type.
    pub fn from_mime(mime: &str) -> Self {
        if mime.trim().to_lowercase().starts_with("image/") {
            Self::Image
        } else {
            Self::File
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
        }
    }

    /// Whether this type requires a stored attachment.
    pub fn has_attachment(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an immutable message in a chat room.
///
/// Maps to the `messages` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - chat_room_id: BIGINT NOT NULL REFERENCES chat_rooms(id) ON DELETE CASCADE
/// - sender_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - content: TEXT NULL
/// - file_url: TEXT NULL
/// - file_type: VARCHAR(255) NULL (MIME type)
/// - type: VARCHAR(5) NOT NULL DEFAULT 'text'
/// - timestamp: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owning room
    pub chat_room_id: i64,

    /// Sending user
    pub sender_id: i64,

    /// Text content, optional for attachments
    pub content: Option<String>,

    /// Durable attachment URL
    pub file_url: Option<String>,

    /// Attachment MIME type
    pub file_type: Option<String>,

    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Set once when the message is persisted
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Canonical in-room ordering key.
    pub fn order_key(&self) -> (DateTime<Utc>, i64) {
        (self.timestamp, self.id)
    }

    /// Check the attachment invariant: image/file messages carry a URL.
    pub fn is_well_formed(&self) -> bool {
        !self.message_type.has_attachment()
            || self.file_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Optional paging over a room's message log.
///
/// Without a cursor or limit the complete log is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessagePage {
    /// Only return messages ordered after this message id
    pub after: Option<i64>,
    /// Maximum number of messages to return
    pub limit: Option<i64>,
}

impl MessagePage {
    pub fn all() -> Self {
        Self::default()
    }

    /// Clamp the limit into `1..=MAX_PAGE_SIZE`.
    pub fn normalized(self) -> Self {
        Self {
            after: self.after,
            limit: self.limit.map(|l| l.clamp(1, MAX_PAGE_SIZE)),
        }
    }
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message to its room's log.
    async fn create(&self, message: &Message) -> Result<Message, AppError>;

    /// Messages of a room in ascending `(timestamp, id)` order.
    async fn find_by_room(&self, room_id: i64, page: MessagePage) -> Result<Vec<Message>, AppError>;

    /// Timestamp of the newest message in a room.
    async fn latest_timestamp(&self, room_id: i64) -> Result<Option<DateTime<Utc>>, AppError>;
}
