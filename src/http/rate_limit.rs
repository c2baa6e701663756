//! Rate limiting implementation
//!
//! Paces requests with a governor quota (minimum interval between request
//! starts) and caps in-flight requests with a semaphore.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum time between two request starts
    pub min_interval: Duration,
    /// Maximum number of requests in flight at once
    pub max_concurrent: usize,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(100),
            max_concurrent: 10,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(min_interval: Duration, max_concurrent: usize) -> Self {
        Self {
            min_interval,
            max_concurrent,
        }
    }

    /// Allow `requests` request starts per second with the given concurrency
    pub fn per_second(requests: u32, max_concurrent: usize) -> Self {
        let min_interval = Duration::from_secs(1)
            .checked_div(requests)
            .unwrap_or(Duration::ZERO);
        Self::new(min_interval, max_concurrent)
    }
}

/// Permit held for the duration of one request
#[derive(Debug)]
pub struct RatePermit {
    _slot: Option<OwnedSemaphorePermit>,
}

/// Request pacer: minimum interval plus a concurrency cap
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Option<Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>>,
    slots: Arc<Semaphore>,
    max_concurrent: usize,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let max_concurrent = config.max_concurrent.max(1);
        let limiter = Quota::with_period(config.min_interval)
            .map(|quota| Arc::new(Governor::direct(quota)));

        Self {
            limiter,
            slots: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Wait for a free slot and for the pacing interval, then hold the slot
    /// until the returned permit is dropped
    pub async fn acquire(&self) -> RatePermit {
        let slot = Arc::clone(&self.slots).acquire_owned().await.ok();
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        RatePermit { _slot: slot }
    }

}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("paced", &self.limiter.is_some())
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}
