//! # Domain Layer
//!
//! The domain layer contains the core business rules of the chat backend.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, ChatRoom, Message, ...) and repository traits
//! - **value_objects**: Immutable value types (RoomRole)
//! - **services**: Domain services (RoomAccessPolicy)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository and blob store traits define external capability contracts
//! - Entities encapsulate domain behavior (roster rules, attachment invariant)

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use value_objects::*;
