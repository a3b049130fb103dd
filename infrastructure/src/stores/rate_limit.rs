//! Fixed-window rate limit counters.

use async_trait::async_trait;
use conductor_application::ports::stores::{RateLimitCounter, RateLimitStore, StoreError};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Window {
    started: Instant,
    length: Duration,
    count: u32,
}

/// One counter per key; a window opens on the first call and resets once
/// it has fully elapsed.
#[derive(Default)]
pub struct FixedWindowRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for FixedWindowRateLimiter {
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitCounter, StoreError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now.duration_since(w.started) < w.length);

        let current = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            length: window,
            count: 0,
        });
        current.count = current.count.saturating_add(1);

        Ok(RateLimitCounter {
            count: current.count,
            reset_after: window.saturating_sub(now.duration_since(current.started)),
        })
    }
}
