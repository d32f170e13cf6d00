//! Minimum-spacing rate limiter.
//!
//! A leaky bucket of depth one: every call to [`RateLimiter::wait`] returns no
//! earlier than `min_interval` after the previous call returned.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Block the calling thread until the next request may be issued, then
    /// record the current instant as the last request time.
    ///
    /// Returns the recorded instant.
    pub fn wait(&self) -> Instant {
        // Held across the sleep: concurrent callers are served one at a time.
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = *last {
            let remaining = self.min_interval.saturating_sub(previous.elapsed());
            if !remaining.is_zero() {
                let wait_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
                tracing::debug!(wait_ms, "rate limit wait");
                thread::sleep(remaining);
            }
        }

        let now = Instant::now();
        *last = Some(now);
        now
    }
}
