//! Message Service
//!
//! Append-only room message log. Attachments are uploaded before the room
//! lock is taken; the membership check and the write happen under it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ChatRoom, Message, MessagePage, MessageRepository, MessageType, RoomAccessPolicy,
    RoomRepository, StoredAttachment, MAX_CONTENT_LENGTH,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

use super::attachment_service::{AttachmentService, AttachmentUpload, UploadError};
use super::room_locks::RoomLocks;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Append a message to a room's log
    async fn append_message(
        &self,
        room_id: i64,
        sender_id: i64,
        message: NewMessage,
    ) -> Result<Message, MessageError>;

    /// Messages of a room in ascending `(timestamp, id)` order
    async fn list_messages(&self, room_id: i64, page: MessagePage) -> Result<Vec<Message>, MessageError>;
}

/// Message as submitted by a sender
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub content: Option<String>,
    /// Explicitly requested type; inferred from the attachment when one is sent
    pub message_type: Option<MessageType>,
    pub attachment: Option<AttachmentUpload>,
}

/// Message errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Only participants can post in this room")]
    NotParticipant,

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for MessageError {
    fn from(err: AppError) -> Self {
        MessageError::Internal(err.to_string())
    }
}

/// MessageService implementation
pub struct MessageServiceImpl {
    room_repo: Arc<dyn RoomRepository>,
    message_repo: Arc<dyn MessageRepository>,
    attachments: Arc<dyn AttachmentService>,
    locks: Arc<RoomLocks>,
    policy: RoomAccessPolicy,
    id_generator: Arc<SnowflakeGenerator>,
}

impl MessageServiceImpl {
    pub fn new(
        room_repo: Arc<dyn RoomRepository>,
        message_repo: Arc<dyn MessageRepository>,
        attachments: Arc<dyn AttachmentService>,
        locks: Arc<RoomLocks>,
        policy: RoomAccessPolicy,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            room_repo,
            message_repo,
            attachments,
            locks,
            policy,
            id_generator,
        }
    }

    async fn room_for_sender(&self, room_id: i64, sender_id: i64) -> Result<ChatRoom, MessageError> {
        let room = self
            .room_repo
            .find_by_id(room_id)
            .await?
            .ok_or(MessageError::RoomNotFound)?;

        if !self.policy.can_post(&room, sender_id) {
            return Err(MessageError::NotParticipant);
        }
        Ok(room)
    }

    /// Membership re-check, timestamp and write, all under the room lock.
    async fn persist(
        &self,
        room_id: i64,
        sender_id: i64,
        content: Option<String>,
        stored: Option<&StoredAttachment>,
    ) -> Result<Message, MessageError> {
        let mut clock = self.locks.acquire(room_id).await;

        // Membership may have changed while the attachment was uploading
        self.room_for_sender(room_id, sender_id).await?;

        if !clock.is_seeded() {
            let latest = self.message_repo.latest_timestamp(room_id).await?;
            clock.seed(latest);
        }

        let message = Message {
            id: self.id_generator.generate(),
            chat_room_id: room_id,
            sender_id,
            content,
            file_url: stored.map(|s| s.url.clone()),
            file_type: stored.map(|s| s.content_type.clone()),
            message_type: stored
                .map(|s| MessageType::from_mime(&s.content_type))
                .unwrap_or(MessageType::Text),
            timestamp: clock.tick(Utc::now()),
        };
        debug_assert!(message.is_well_formed());

        Ok(self.message_repo.create(&message).await?)
    }
}

/// Check content and type before anything is uploaded.
fn validate(
    content: Option<String>,
    requested: Option<MessageType>,
    has_attachment: bool,
) -> Result<Option<String>, MessageError> {
    let content = content.filter(|c| !c.trim().is_empty());

    if let Some(text) = &content {
        if text.chars().count() > MAX_CONTENT_LENGTH {
            return Err(MessageError::Invalid(format!(
                "Message content must be at most {} characters",
                MAX_CONTENT_LENGTH
            )));
        }
    }

    if has_attachment {
        return Ok(content);
    }

    match requested.unwrap_or_default() {
        MessageType::Text if content.is_none() => Err(MessageError::Invalid(
            "Text messages require content".into(),
        )),
        MessageType::Text => Ok(content),
        other => Err(MessageError::Invalid(format!(
            "A file is required for {} messages",
            other
        ))),
    }
}

#[async_trait]
impl MessageService for MessageServiceImpl {
    async fn append_message(
        &self,
        room_id: i64,
        sender_id: i64,
        message: NewMessage,
    ) -> Result<Message, MessageError> {
        self.room_for_sender(room_id, sender_id).await?;

        let content = validate(message.content, message.message_type, message.attachment.is_some())?;

        let stored = match message.attachment {
            Some(upload) => Some(self.attachments.upload(sender_id, upload).await?),
            None => None,
        };

        let result = self.persist(room_id, sender_id, content, stored.as_ref()).await;

        match result {
            Ok(message) => {
                metrics::record_message_appended(message.message_type.as_str());
                tracing::info!(
                    room_id,
                    sender_id,
                    message_id = message.id,
                    message_type = %message.message_type,
                    "Message appended"
                );
                Ok(message)
            }
            Err(err) => {
                if let Some(stored) = stored {
                    self.attachments.discard(&stored.key).await;
                }
                Err(err)
            }
        }
    }

    async fn list_messages(&self, room_id: i64, page: MessagePage) -> Result<Vec<Message>, MessageError> {
        if self.room_repo.find_by_id(room_id).await?.is_none() {
            return Err(MessageError::RoomNotFound);
        }
        Ok(self.message_repo.find_by_room(room_id, page).await?)
    }
}
