//! In-memory message log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{Message, MessagePage, MessageRepository};
use crate::shared::error::AppError;

/// Per-room message vectors kept in `(timestamp, id)` order.
#[derive(Default)]
pub struct MemoryMessageRepository {
    rooms: DashMap<i64, Vec<Message>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let mut log = self.rooms.entry(message.chat_room_id).or_default();
        let key = message.order_key();
        let at = log.partition_point(|m| m.order_key() <= key);
        log.insert(at, message.clone());
        Ok(message.clone())
    }

    async fn find_by_room(&self, room_id: i64, page: MessagePage) -> Result<Vec<Message>, AppError> {
        let page = page.normalized();
        let Some(log) = self.rooms.get(&room_id) else {
            return Ok(Vec::new());
        };

        let start = match page.after {
            Some(after_id) => match log.iter().position(|m| m.id == after_id) {
                Some(index) => index + 1,
                None => return Ok(Vec::new()),
            },
            None => 0,
        };

        let remaining = log.iter().skip(start).cloned();
        Ok(match page.limit {
            Some(limit) => remaining.take(limit as usize).collect(),
            None => remaining.collect(),
        })
    }

    async fn latest_timestamp(&self, room_id: i64) -> Result<Option<DateTime<Utc>>, AppError> {
        Ok(self
            .rooms
            .get(&room_id)
            .and_then(|log| log.iter().map(|m| m.timestamp).max()))
    }
}
