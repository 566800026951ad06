//! Minimum-delay rate limiting for outbound requests
//!
//! The harvester is strictly sequential, so a single limiter shared by every
//! pagination stream is enough to keep requests spaced out.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Enforces a minimum delay between outbound requests
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,

    /// Time the most recent request was (or is scheduled to be) sent
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until at least `interval` has passed since the previous request
    ///
    /// The first call never waits.
    pub async fn acquire(&self) {
        let delay = {
            let mut last = self
                .last_request
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let now = Instant::now();
            let delay = match *last {
                Some(previous) => self
                    .interval
                    .saturating_sub(now.saturating_duration_since(previous)),
                None => Duration::ZERO,
            };
            *last = Some(now + delay);
            delay
        };

        if !delay.is_zero() {
            tracing::trace!("Rate limiting: sleeping {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Sleeps for one full interval regardless of request history
    ///
    /// Used between entities, on top of the spacing `acquire` enforces.
    pub async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}
