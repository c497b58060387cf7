//! Server core functionality
//!
//! Shared application state, the router and the HTTP listener.

pub mod core;
pub mod state;

pub use core::{Server, build_router};
pub use state::AppState;
