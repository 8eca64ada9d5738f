//! Per-room mutual exclusion.
//!
//! Roster mutations and message appends for one room are serialized through
//! an async mutex keyed by room id. The guarded value is the room's message
//! clock, which keeps timestamps non-decreasing within the room.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Last timestamp handed out for a room. `None` until seeded from the store.
#[derive(Debug, Default)]
pub struct RoomClock {
    last: Option<DateTime<Utc>>,
}

impl RoomClock {
    pub fn is_seeded(&self) -> bool {
        self.last.is_some()
    }

    pub fn seed(&mut self, latest: Option<DateTime<Utc>>) {
        self.last = Some(latest.unwrap_or(DateTime::<Utc>::MIN_UTC));
    }

    /// Next timestamp: `max(now, last)`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self.last {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last = Some(next);
        next
    }
}

/// Registry of per-room locks.
#[derive(Debug, Default)]
pub struct RoomLocks {
    slots: DashMap<i64, Arc<Mutex<RoomClock>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the room.
    pub async fn acquire(&self, room_id: i64) -> OwnedMutexGuard<RoomClock> {
        // Clone the slot out so the map shard is not held across the await.
        let slot: Arc<Mutex<RoomClock>> = self.slots.entry(room_id).or_default().value().clone();
        slot.lock_owned().await
    }
}
