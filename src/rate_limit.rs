//! Minimum-interval rate limiting, one instance per remote service.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Enforces a minimum delay between consecutive permitted requests.
///
/// The lock is held across the whole wait-then-stamp sequence, so concurrent
/// callers are strictly serialized: no two callers can observe the same
/// "last request" instant and both proceed inside one window.
pub struct RateLimiter {
    name: &'static str,
    min_delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(name: &'static str, min_delay: Duration) -> Self {
        Self {
            name,
            min_delay,
            last: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Block until `min_delay` has elapsed since the previous permitted
    /// request, then record the current instant.
    pub fn wait(&self) {
        // A poisoned lock only means another caller panicked mid-wait; the
        // stored instant is still meaningful.
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_delay {
                let pause = self.min_delay - elapsed;
                tracing::trace!(service = self.name, ?pause, "rate limiting");
                thread::sleep(pause);
            }
        }
        *last = Some(Instant::now());
    }
}
