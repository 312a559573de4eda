use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

const LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Token bucket in front of the dictionary service. Callers that find the
/// bucket empty wait for their token instead of being turned away.
#[derive(Debug)]
pub struct Throttle {
    rate_per_sec: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
    waits_since_log: AtomicU64,
    last_log: Mutex<Instant>,
}

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Throttle {
    /// `None` when `rate_per_sec` is 0, meaning lookups are not throttled.
    pub fn new(rate_per_sec: u32, burst: u32) -> Option<Self> {
        if rate_per_sec == 0 {
            return None;
        }
        let burst = f64::from(burst.max(1));
        let now = Instant::now();
        Some(Self {
            rate_per_sec: f64::from(rate_per_sec),
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: now,
            }),
            waits_since_log: AtomicU64::new(0),
            last_log: Mutex::new(now),
        })
    }

    /// Take one token, sleeping until it is available.
    pub async fn acquire(&self) {
        let wait = self.reserve();
        if wait.is_zero() {
            return;
        }
        self.waits_since_log.fetch_add(1, Ordering::Relaxed);
        self.log_waits_if_needed();
        debug!("throttling dictionary lookup for {} ms", wait.as_millis());
        tokio::time::sleep(wait).await;
    }

    /// Refill, then claim a token. The bucket may go negative; the deficit is
    /// how long this caller has to wait, so waiters are served in order.
    fn reserve(&self) -> Duration {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let elapsed = now
            .saturating_duration_since(bucket.last_refill)
            .as_secs_f64();
        if elapsed > 0.0 {
            bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst);
            bucket.last_refill = now;
        }
        bucket.tokens -= 1.0;
        if bucket.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-bucket.tokens / self.rate_per_sec)
        }
    }

    fn log_waits_if_needed(&self) {
        let now = Instant::now();
        let mut last = self.last_log.lock().unwrap_or_else(PoisonError::into_inner);
        if now.saturating_duration_since(*last) >= LOG_INTERVAL {
            let waits = self.waits_since_log.swap(0, Ordering::Relaxed);
            if waits > 0 {
                warn!("throttle delayed {waits} dictionary lookups in the last minute");
            }
            *last = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_disables_throttling() {
        assert!(Throttle::new(0, 5).is_none());
    }

    #[test]
    fn burst_is_free_then_callers_queue() {
        let throttle = Throttle::new(2, 2).unwrap();
        assert_eq!(throttle.reserve(), Duration::ZERO);
        assert_eq!(throttle.reserve(), Duration::ZERO);

        let third = throttle.reserve();
        assert!(third > Duration::from_millis(400), "{third:?}");
        assert!(third <= Duration::from_millis(500), "{third:?}");

        let fourth = throttle.reserve();
        assert!(fourth > Duration::from_millis(900), "{fourth:?}");
        assert!(fourth <= Duration::from_secs(1), "{fourth:?}");
    }

    #[test]
    fn zero_burst_still_allows_one_request() {
        let throttle = Throttle::new(10, 0).unwrap();
        assert_eq!(throttle.reserve(), Duration::ZERO);
    }

    #[tokio::test]
    async fn acquire_waits_for_the_next_token() {
        let throttle = Throttle::new(20, 1).unwrap();
        throttle.acquire().await;
        let start = Instant::now();
        throttle.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(throttle.waits_since_log.load(Ordering::Relaxed), 1);
    }
}
