//! Error handling
//!
//! Defines error types and their mapping onto HTTP responses.

pub mod handlers;
pub mod types;

pub use handlers::{JsonError, error_to_status};
pub use types::*;
