//! Shared application state

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::auth::AuthGate;
use crate::config::ServerConfig;
use crate::middleware::RateLimiter;
use crate::storage::StorageRoot;
use crate::transfer::UploadLimits;

/// State handed to every handler
pub struct AppState {
    pub root: StorageRoot,
    pub gate: Arc<dyn AuthGate>,
    pub upload_limits: UploadLimits,
    pub session_ttl: Duration,
    pub secure_cookies: bool,
    pub login_limiter: Mutex<RateLimiter>,
}

impl AppState {
    pub fn new(config: &ServerConfig, root: StorageRoot, gate: Arc<dyn AuthGate>) -> Self {
        Self {
            root,
            gate,
            upload_limits: UploadLimits {
                max_files: config.max_upload_files,
                max_file_size: config.max_upload_size_bytes(),
            },
            session_ttl: config.session_ttl(),
            secure_cookies: config.secure_cookies,
            login_limiter: Mutex::new(RateLimiter::new(
                config.login_max_attempts,
                config.login_window(),
            )),
        }
    }
}
