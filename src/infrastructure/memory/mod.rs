//! In-Memory Repositories
//!
//! Implementations of the domain repository traits over process memory.
//! Selected when no database URL is configured (development and tests).

mod message_repository;
mod profile_repository;
mod room_repository;
mod user_repository;

pub use message_repository::MemoryMessageRepository;
pub use profile_repository::MemoryProfileRepository;
pub use room_repository::MemoryRoomRepository;
pub use user_repository::MemoryUserRepository;
