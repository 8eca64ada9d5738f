//! Room role value object.

use serde::{Deserialize, Serialize};

/// Role a user holds inside a single room.
///
/// Ordered by privilege: `Participant < Moderator < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomRole {
    Participant,
    Moderator,
    Admin,
}

impl RoomRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may change the room's roster.
    pub fn can_manage_roster(&self) -> bool {
        *self >= Self::Moderator
    }
}

impl std::fmt::Display for RoomRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
