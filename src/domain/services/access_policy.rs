//! Room access policy domain service.

use crate::domain::entities::ChatRoom;

/// Decides what a user may do with a room.
///
/// Listing is always participant-scoped. Viewing a room's detail or log
/// requires a role in the room, unless public rooms were opened up for
/// reading via configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomAccessPolicy {
    public_rooms_readable: bool,
}

impl RoomAccessPolicy {
    pub fn new(public_rooms_readable: bool) -> Self {
        Self {
            public_rooms_readable,
        }
    }

    /// Room detail and message history.
    pub fn can_view(&self, room: &ChatRoom, user_id: i64) -> bool {
        room.role_of(user_id).is_some() || (self.public_rooms_readable && room.is_public)
    }

    /// Appending messages.
    pub fn can_post(&self, room: &ChatRoom, user_id: i64) -> bool {
        room.is_participant(user_id)
    }

    /// Adding/removing participants and promoting/demoting moderators.
    pub fn can_manage_roster(&self, room: &ChatRoom, user_id: i64) -> bool {
        room.role_of(user_id)
            .is_some_and(|role| role.can_manage_roster())
    }

    /// Renaming the room or changing its description or visibility.
    pub fn can_update_settings(&self, room: &ChatRoom, user_id: i64) -> bool {
        self.can_manage_roster(room, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RosterChange;
    use chrono::Utc;

    fn public_room() -> ChatRoom {
        let mut room = ChatRoom::new(1, 100, "Lobby".into(), None, true, Utc::now());
        room.apply(RosterChange::AddParticipant(200)).unwrap();
        room.apply(RosterChange::PromoteModerator(300)).unwrap();
        room
    }

    #[test]
    fn test_participant_scoped_by_default() {
        let policy = RoomAccessPolicy::default();
        let room = public_room();

        assert!(policy.can_view(&room, 100));
        assert!(policy.can_view(&room, 200));
        assert!(policy.can_view(&room, 300));
        assert!(!policy.can_view(&room, 999));
    }

    #[test]
    fn test_public_rooms_readable() {
        let policy = RoomAccessPolicy::new(true);
        let mut room = public_room();
        assert!(policy.can_view(&room, 999));

        room.is_public = false;
        assert!(!policy.can_view(&room, 999));
    }

    #[test]
    fn test_only_participants_post() {
        let policy = RoomAccessPolicy::default();
        let room = public_room();
        assert!(policy.can_post(&room, 200));
        // Moderators outside the participant set cannot post
        assert!(!policy.can_post(&room, 300));
    }

    #[test]
    fn test_roster_management() {
        let policy = RoomAccessPolicy::default();
        let room = public_room();
        assert!(policy.can_manage_roster(&room, 100));
        assert!(policy.can_manage_roster(&room, 300));
        assert!(!policy.can_manage_roster(&room, 200));
        assert!(!policy.can_manage_roster(&room, 999));
    }

    #[test]
    fn test_settings_follow_roster_rights() {
        let policy = RoomAccessPolicy::default();
        let room = public_room();
        assert!(policy.can_update_settings(&room, 100));
        assert!(policy.can_update_settings(&room, 300));
        assert!(!policy.can_update_settings(&room, 200));
        assert!(!policy.can_update_settings(&room, 999));
    }
}
