//! # Blog Shared
//!
//! Wire types for the HTTP API: request bodies, response bodies and
//! RFC 7807 problem documents.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
