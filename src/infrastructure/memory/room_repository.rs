//! In-memory chat room repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{ChatRoom, RoomRepository, RosterChange};
use crate::shared::error::AppError;

/// Rooms behind one lock, so the unique-name check and the insert are a
/// single critical section.
#[derive(Default)]
pub struct MemoryRoomRepository {
    rooms: RwLock<HashMap<i64, ChatRoom>>,
}

impl MemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for MemoryRoomRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        Ok(self.rooms.read().get(&id).cloned())
    }

    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<ChatRoom>, AppError> {
        let mut rooms: Vec<ChatRoom> = self
            .rooms
            .read()
            .values()
            .filter(|r| r.is_participant(user_id))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(rooms)
    }

    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.rooms.read().values().any(|r| r.name == name))
    }

    async fn create(&self, room: &ChatRoom) -> Result<ChatRoom, AppError> {
        let mut rooms = self.rooms.write();
        if rooms.values().any(|r| r.name == room.name) {
            return Err(AppError::Conflict(format!(
                "A room named '{}' already exists",
                room.name
            )));
        }
        rooms.insert(room.id, room.clone());
        Ok(room.clone())
    }

    async fn update_details(&self, room: &ChatRoom) -> Result<ChatRoom, AppError> {
        let mut rooms = self.rooms.write();
        if rooms.values().any(|r| r.id != room.id && r.name == room.name) {
            return Err(AppError::Conflict(format!(
                "A room named '{}' already exists",
                room.name
            )));
        }
        let stored = rooms
            .get_mut(&room.id)
            .ok_or_else(|| AppError::NotFound(format!("Room with id {} not found", room.id)))?;

        stored.name = room.name.clone();
        stored.description = room.description.clone();
        stored.is_public = room.is_public;
        stored.updated_at = room.updated_at;
        Ok(stored.clone())
    }

    async fn apply_roster_change(
        &self,
        room_id: i64,
        change: RosterChange,
        now: DateTime<Utc>,
    ) -> Result<ChatRoom, AppError> {
        let mut rooms = self.rooms.write();
        let room = rooms
            .get_mut(&room_id)
            .ok_or_else(|| AppError::NotFound(format!("Room with id {} not found", room_id)))?;

        if room.apply(change)? {
            room.updated_at = now;
        }
        Ok(room.clone())
    }
}
