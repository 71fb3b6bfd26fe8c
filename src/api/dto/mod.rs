//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire to match the WebSocket event
//! payloads.

pub mod bin_dto;
pub mod capture_dto;

pub use bin_dto::*;
pub use capture_dto::*;
