//! Chat room entity, roster changes and repository trait.
//!
//! Maps to the `chat_rooms` table plus the `chat_room_participants` and
//! `chat_room_moderators` join tables.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RoomRole;
use crate::shared::error::AppError;

/// Maximum room name length in characters.
pub const MAX_ROOM_NAME_LENGTH: usize = 255;

/// A named container for messages with a membership roster and an admin.
///
/// Maps to the `chat_rooms` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(255) NOT NULL UNIQUE
/// - description: TEXT NULL
/// - is_public: BOOLEAN NOT NULL DEFAULT FALSE
/// - admin_id: BIGINT NULL REFERENCES users(id) ON DELETE SET NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Unique, non-empty room name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Public or private room
    pub is_public: bool,

    /// Owning admin. `None` only after the admin account was removed.
    pub admin_id: Option<i64>,

    /// Users with read/send access
    pub participant_ids: BTreeSet<i64>,

    /// Users with roster-management rights (not necessarily participants)
    pub moderator_ids: BTreeSet<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatRoom {
    /// Build a new room owned by `creator_id`, who is both admin and first participant.
    pub fn new(
        id: i64,
        creator_id: i64,
        name: String,
        description: Option<String>,
        is_public: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            is_public,
            admin_id: Some(creator_id),
            participant_ids: BTreeSet::from([creator_id]),
            moderator_ids: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id == Some(user_id)
    }

    pub fn is_participant(&self, user_id: i64) -> bool {
        self.participant_ids.contains(&user_id)
    }

    pub fn is_moderator(&self, user_id: i64) -> bool {
        self.moderator_ids.contains(&user_id)
    }

    /// Highest role the user holds in this room, if any.
    pub fn role_of(&self, user_id: i64) -> Option<RoomRole> {
        if self.is_admin(user_id) {
            Some(RoomRole::Admin)
        } else if self.is_moderator(user_id) {
            Some(RoomRole::Moderator)
        } else if self.is_participant(user_id) {
            Some(RoomRole::Participant)
        } else {
            None
        }
    }

    /// Apply a roster change in place.
    ///
    /// Returns `Ok(false)` when the change is a no-op (e.g. adding an
    /// existing participant).
    pub fn apply(&mut self, change: RosterChange) -> Result<bool, RosterError> {
        let changed = match change {
            RosterChange::AddParticipant(user_id) => self.participant_ids.insert(user_id),
            RosterChange::RemoveParticipant(user_id) => {
                if self.is_admin(user_id) {
                    return Err(RosterError::AdminRemoval);
                }
                self.participant_ids.remove(&user_id)
            }
            RosterChange::PromoteModerator(user_id) => self.moderator_ids.insert(user_id),
            RosterChange::DemoteModerator(user_id) => self.moderator_ids.remove(&user_id),
        };
        Ok(changed)
    }
}

/// A single mutation of a room's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    AddParticipant(i64),
    RemoveParticipant(i64),
    PromoteModerator(i64),
    DemoteModerator(i64),
}

impl RosterChange {
    /// The user the change applies to.
    pub fn target(&self) -> i64 {
        match *self {
            Self::AddParticipant(id)
            | Self::RemoveParticipant(id)
            | Self::PromoteModerator(id)
            | Self::DemoteModerator(id) => id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddParticipant(_) => "add_participant",
            Self::RemoveParticipant(_) => "remove_participant",
            Self::PromoteModerator(_) => "promote_moderator",
            Self::DemoteModerator(_) => "demote_moderator",
        }
    }
}

/// Roster invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("The room admin cannot be removed from the participants")]
    AdminRemoval,
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Repository trait for ChatRoom data access operations.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find a room (with its roster) by Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatRoom>, AppError>;

    /// Find all rooms the user participates in, most recently updated first.
    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<ChatRoom>, AppError>;

    /// Check whether a room name is taken.
    async fn name_exists(&self, name: &str) -> Result<bool, AppError>;

    /// Persist a new room together with its initial roster in one atomic step.
    ///
    /// Fails with `AppError::Conflict` if the name is already taken.
    async fn create(&self, room: &ChatRoom) -> Result<ChatRoom, AppError>;

    /// Store the room's name, description, visibility and `updated_at`.
    ///
    /// The roster is left untouched. Fails with `AppError::NotFound` for an
    /// unknown room and `AppError::Conflict` if another room has the name.
    async fn update_details(&self, room: &ChatRoom) -> Result<ChatRoom, AppError>;

    /// Apply a roster change atomically against the stored room.
    ///
    /// Fails with `AppError::NotFound` for an unknown room and
    /// `AppError::Validation` if the change violates a roster invariant.
    async fn apply_roster_change(
        &self,
        room_id: i64,
        change: RosterChange,
        now: DateTime<Utc>,
    ) -> Result<ChatRoom, AppError>;
}
