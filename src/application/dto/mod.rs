//! Data Transfer Objects
//!
//! DTOs for API request/response serialization. Ids travel as strings.

pub mod request;
pub mod response;
