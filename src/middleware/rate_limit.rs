//! Rate limiting middleware
//!
//! Sliding-window limiter used for login attempts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Simple rate limiter
pub struct RateLimiter {
    requests: HashMap<String, Vec<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: HashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn is_allowed(&mut self, client_id: &str) -> bool {
        let now = Instant::now();
        let window = self.window;

        // Drop clients whose whole history has aged out
        self.requests
            .retain(|_, times| times.iter().any(|&time| now.duration_since(time) <= window));

        let entry = self.requests.entry(client_id.to_string()).or_default();

        // Remove old requests
        entry.retain(|&time| now.duration_since(time) <= window);

        // Check if under limit
        if entry.len() < self.max_requests {
            entry.push(now);
            true
        } else {
            false
        }
    }

    /// Forget a client's history, e.g. after a successful login
    pub fn reset(&mut self, client_id: &str) {
        self.requests.remove(client_id);
    }
}
