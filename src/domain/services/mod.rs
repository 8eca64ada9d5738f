//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong to
//! a single entity.
//!
//! ## Services
//!
//! - **RoomAccessPolicy**: who may view a room, post to it, or manage its roster

mod access_policy;

pub use access_policy::*;
