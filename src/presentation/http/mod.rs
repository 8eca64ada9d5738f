//! HTTP API
//!
//! Routes, request handlers, extractors and service error translation.

pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod routes;
