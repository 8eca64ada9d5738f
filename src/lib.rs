//! # Roomchat
//!
//! Backend for a multi-room chat service:
//! - Account registration and JWT login
//! - Chat rooms with an admin, moderators and participants
//! - Ordered, append-only message logs with optional attachments
//! - PostgreSQL or in-memory persistence, S3 attachment storage
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, repository traits, access policy
//! - **Application Layer**: Services and DTOs
//! - **Infrastructure Layer**: PostgreSQL, in-memory, blob storage, metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! roomchat/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, and traits
//! +-- application/    Services and DTOs
//! +-- infrastructure/ Storage backends and metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
