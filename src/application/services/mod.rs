//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Registration, credential checks, JWT tokens
//! - **RoomService**: Room registry and roster mutations
//! - **MessageService**: Room message log
//! - **AttachmentService**: Attachment upload to the blob store
//! - **ProfileService**: User profile management

pub mod attachment_service;
pub mod auth_service;
pub mod message_service;
pub mod profile_service;
pub mod room_locks;
pub mod room_service;

// Re-export auth service types
pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims, TokenType};

// Re-export room service types
pub use room_locks::{RoomClock, RoomLocks};
pub use room_service::{RoomDetail, RoomError, RoomService, RoomServiceImpl, RoomUpdate};

// Re-export message service types
pub use message_service::{MessageError, MessageService, MessageServiceImpl, NewMessage};

// Re-export attachment service types
pub use attachment_service::{
    AttachmentService, AttachmentServiceImpl, AttachmentUpload, UploadError,
};

// Re-export profile service types
pub use profile_service::{ProfileError, ProfileService, ProfileServiceImpl, ProfileUpdate};
