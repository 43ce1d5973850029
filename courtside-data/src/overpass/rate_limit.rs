//! Per-endpoint request windows.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Window {
    /// `None` when the window length overflows the clock.
    closes_at: Option<Instant>,
    count: u32,
}

impl Window {
    fn is_open(&self, now: Instant) -> bool {
        self.closes_at.is_none_or(|closes_at| now < closes_at)
    }
}

/// Caps requests per key within a fixed window.
///
/// A window opens on the first request for a key and admits at most
/// `max_requests` calls. Further callers wait until the window closes and
/// then start a fresh one. Windows are measured on the Tokio clock, so a
/// paused test runtime can drive them.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per `window` for each key.
    ///
    /// A cap of zero is treated as one. A window too long for the clock
    /// never closes.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Window>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until a request for `key` is permitted, then count it.
    ///
    /// Never fails. Dropping the returned future abandons the wait without
    /// consuming a slot.
    pub async fn throttle(&self, key: &str) {
        loop {
            let reopens_at = {
                let mut windows = self.lock();
                let now = Instant::now();
                windows.retain(|_, window| window.is_open(now));
                match windows.get_mut(key) {
                    Some(window) if window.count >= self.max_requests => window.closes_at,
                    Some(window) => {
                        window.count += 1;
                        return;
                    }
                    None => {
                        windows.insert(
                            key.to_owned(),
                            Window {
                                closes_at: now.checked_add(self.window),
                                count: 1,
                            },
                        );
                        return;
                    }
                }
            };
            match reopens_at {
                Some(reopens_at) => {
                    debug!(
                        "rate limit reached for {key}; waiting {:?}",
                        reopens_at.saturating_duration_since(Instant::now())
                    );
                    tokio::time::sleep_until(reopens_at).await;
                }
                None => {
                    debug!("rate limit reached for {key}; window never closes");
                    std::future::pending::<()>().await;
                }
            }
        }
    }

    /// Number of keys with an open window.
    #[must_use]
    pub fn active_windows(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .values()
            .filter(|window| window.is_open(now))
            .count()
    }
}
