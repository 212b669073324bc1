//! Rate Limiter
//!
//! Courtesy spacing for outbound calls to providers with a usage policy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Minimum time between two consecutive permits
    pub min_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
        }
    }
}

/// Minimum-interval rate limiter.
///
/// Permits are handed out one at a time, in arrival order, and never closer
/// together than `min_interval`. Waiters are suspended, not rejected.
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Earliest instant the next permit may be granted
    next_slot: Mutex<Option<Instant>>,
    /// Permits granted so far
    granted: AtomicU64,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            next_slot: Mutex::new(None),
            granted: AtomicU64::new(0),
        }
    }

    /// Wait until a call is allowed.
    ///
    /// Returns how long the caller was delayed.
    pub async fn acquire(&self) -> Duration {
        let mut next_slot = self.next_slot.lock().await;

        let now = Instant::now();
        let waited = match *next_slot {
            Some(slot) if slot > now => {
                tokio::time::sleep_until(slot).await;
                slot - now
            }
            _ => Duration::ZERO,
        };

        *next_slot = Some(Instant::now() + self.config.min_interval);
        self.granted.fetch_add(1, Ordering::Relaxed);

        if !waited.is_zero() {
            tracing::debug!("rate limiter delayed call by {:?}", waited);
        }
        waited
    }

    /// Number of permits granted.
    pub fn granted(&self) -> u64 {
        self.granted.load(Ordering::Relaxed)
    }

    pub fn min_interval(&self) -> Duration {
        self.config.min_interval
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
