//! Room Service
//!
//! Room registry: creation, participant-scoped listing, detail views and
//! roster mutations. Roster mutations are serialized per room.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ChatRoom, Message, MessagePage, MessageRepository, RoomRepository, RosterChange,
    UserRepository, MAX_ROOM_NAME_LENGTH,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

use super::room_locks::RoomLocks;

/// Room service trait
#[async_trait]
pub trait RoomService: Send + Sync {
    /// Create a room; the creator becomes admin and first participant
    async fn create_room(
        &self,
        creator_id: i64,
        name: &str,
        description: Option<String>,
        is_public: bool,
    ) -> Result<ChatRoom, RoomError>;

    /// Rooms the user participates in, most recently updated first
    async fn list_visible_rooms(&self, user_id: i64) -> Result<Vec<ChatRoom>, RoomError>;

    async fn get_room(&self, room_id: i64) -> Result<ChatRoom, RoomError>;

    /// Change name, description or visibility; the roster is untouched
    async fn update_room(&self, room_id: i64, update: RoomUpdate) -> Result<ChatRoom, RoomError>;

    /// Room plus its full ordered message log
    async fn get_room_detail(&self, room_id: i64) -> Result<RoomDetail, RoomError>;

    async fn add_participant(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError>;

    async fn remove_participant(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError>;

    async fn promote_moderator(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError>;

    async fn demote_moderator(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError>;
}

/// Room settings update. `None` leaves a field unchanged; an empty
/// description clears it.
#[derive(Debug, Clone, Default)]
pub struct RoomUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// A room together with its message log.
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: ChatRoom,
    pub messages: Vec<Message>,
}

/// Room errors
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    InvalidName(String),

    #[error("A room with this name already exists")]
    NameTaken,

    #[error("The room admin cannot be removed from the participants")]
    CannotRemoveAdmin,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for RoomError {
    fn from(err: AppError) -> Self {
        RoomError::Internal(err.to_string())
    }
}

/// RoomService implementation
pub struct RoomServiceImpl {
    room_repo: Arc<dyn RoomRepository>,
    user_repo: Arc<dyn UserRepository>,
    message_repo: Arc<dyn MessageRepository>,
    locks: Arc<RoomLocks>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl RoomServiceImpl {
    pub fn new(
        room_repo: Arc<dyn RoomRepository>,
        user_repo: Arc<dyn UserRepository>,
        message_repo: Arc<dyn MessageRepository>,
        locks: Arc<RoomLocks>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            room_repo,
            user_repo,
            message_repo,
            locks,
            id_generator,
        }
    }

    async fn apply(&self, room_id: i64, change: RosterChange) -> Result<ChatRoom, RoomError> {
        let _guard = self.locks.acquire(room_id).await;

        if self.room_repo.find_by_id(room_id).await?.is_none() {
            return Err(RoomError::NotFound);
        }
        if self.user_repo.find_by_id(change.target()).await?.is_none() {
            return Err(RoomError::UserNotFound);
        }

        let room = self
            .room_repo
            .apply_roster_change(room_id, change, Utc::now())
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => RoomError::NotFound,
                AppError::Validation(_) => RoomError::CannotRemoveAdmin,
                other => RoomError::Internal(other.to_string()),
            })?;

        metrics::record_roster_change(change.as_str());
        tracing::info!(
            room_id,
            user_id = change.target(),
            change = change.as_str(),
            "Roster updated"
        );

        Ok(room)
    }
}

fn normalize_name(name: &str) -> Result<String, RoomError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RoomError::InvalidName("Room name must not be empty".into()));
    }
    if name.chars().count() > MAX_ROOM_NAME_LENGTH {
        return Err(RoomError::InvalidName(format!(
            "Room name must be at most {} characters",
            MAX_ROOM_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

#[async_trait]
impl RoomService for RoomServiceImpl {
    async fn create_room(
        &self,
        creator_id: i64,
        name: &str,
        description: Option<String>,
        is_public: bool,
    ) -> Result<ChatRoom, RoomError> {
        let name = normalize_name(name)?;
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if self.room_repo.name_exists(&name).await? {
            return Err(RoomError::NameTaken);
        }

        let room = ChatRoom::new(
            self.id_generator.generate(),
            creator_id,
            name,
            description,
            is_public,
            Utc::now(),
        );

        // The unique constraint settles races between concurrent creators
        let room = self.room_repo.create(&room).await.map_err(|e| match e {
            AppError::Conflict(_) => RoomError::NameTaken,
            other => RoomError::Internal(other.to_string()),
        })?;

        tracing::info!(room_id = room.id, creator_id, "Room created");
        Ok(room)
    }

    async fn list_visible_rooms(&self, user_id: i64) -> Result<Vec<ChatRoom>, RoomError> {
        Ok(self.room_repo.find_by_participant(user_id).await?)
    }

    async fn get_room(&self, room_id: i64) -> Result<ChatRoom, RoomError> {
        self.room_repo
            .find_by_id(room_id)
            .await?
            .ok_or(RoomError::NotFound)
    }

    async fn update_room(&self, room_id: i64, update: RoomUpdate) -> Result<ChatRoom, RoomError> {
        let _guard = self.locks.acquire(room_id).await;

        let mut room = self
            .room_repo
            .find_by_id(room_id)
            .await?
            .ok_or(RoomError::NotFound)?;

        if let Some(name) = update.name {
            let name = normalize_name(&name)?;
            if name != room.name && self.room_repo.name_exists(&name).await? {
                return Err(RoomError::NameTaken);
            }
            room.name = name;
        }
        if let Some(description) = update.description {
            room.description = Some(description.trim().to_string()).filter(|d| !d.is_empty());
        }
        if let Some(is_public) = update.is_public {
            room.is_public = is_public;
        }
        room.updated_at = Utc::now();

        let room = self.room_repo.update_details(&room).await.map_err(|e| match e {
            AppError::Conflict(_) => RoomError::NameTaken,
            AppError::NotFound(_) => RoomError::NotFound,
            other => RoomError::Internal(other.to_string()),
        })?;

        tracing::info!(room_id, "Room settings updated");
        Ok(room)
    }

    async fn get_room_detail(&self, room_id: i64) -> Result<RoomDetail, RoomError> {
        let room = self.get_room(room_id).await?;
        let messages = self
            .message_repo
            .find_by_room(room_id, MessagePage::all())
            .await?;
        Ok(RoomDetail { room, messages })
    }

    async fn add_participant(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError> {
        self.apply(room_id, RosterChange::AddParticipant(user_id)).await
    }

    async fn remove_participant(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError> {
        self.apply(room_id, RosterChange::RemoveParticipant(user_id)).await
    }

    async fn promote_moderator(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError> {
        self.apply(room_id, RosterChange::PromoteModerator(user_id)).await
    }

    async fn demote_moderator(&self, room_id: i64, user_id: i64) -> Result<ChatRoom, RoomError> {
        self.apply(room_id, RosterChange::DemoteModerator(user_id)).await
    }
}
