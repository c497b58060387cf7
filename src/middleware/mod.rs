//! Server middleware
//!
//! Provides request logging, login rate limiting and the session check that
//! guards every protected route.

pub mod logging;
pub mod rate_limit;
pub mod session;

pub use logging::log_requests;
pub use rate_limit::RateLimiter;
pub use session::{SESSION_COOKIE, require_session};
