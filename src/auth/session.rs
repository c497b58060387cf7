//! Session claims

use std::time::SystemTime;

/// Decoded session, attached to every authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserClaims {
    pub username: String,
    pub issued_at: SystemTime,
    pub expires_at: SystemTime,
}
