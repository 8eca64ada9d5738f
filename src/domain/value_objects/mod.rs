//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **RoomRole**: admin / moderator / participant standing inside a room

mod room_role;

pub use room_role::*;
