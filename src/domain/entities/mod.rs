//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the chat backend.
//!
//! ## Core Entities
//!
//! - **User**: Account with credentials (identity store)
//! - **UserProfile**: Optional bio/avatar data, 1:1 with User
//! - **ChatRoom**: A named room with admin, participants and moderators
//! - **Message**: An immutable entry in a room's log
//! - **StoredAttachment**: Attachment written to the external blob store
//!
//! ## Repository Traits
//!
//! Each persisted entity has an associated repository trait defining data
//! access operations. These traits are implemented in the infrastructure
//! layer (PostgreSQL and in-memory), following the dependency inversion principle.

mod user;
mod profile;
mod room;
mod message;
mod attachment;

pub use user::{User, UserRepository};

pub use profile::{ProfileRepository, UserProfile, MAX_BIO_LENGTH};

pub use room::{ChatRoom, RoomRepository, RosterChange, RosterError, MAX_ROOM_NAME_LENGTH};

pub use message::{
    Message, MessagePage, MessageRepository, MessageType, MAX_CONTENT_LENGTH, MAX_PAGE_SIZE,
};

pub use attachment::{
    file_extension, BlobStore, BlobStoreError, StoredAttachment, MAX_ATTACHMENT_SIZE, OCTET_STREAM,
};

#[cfg(test)]
pub use attachment::MockBlobStore;
