//! Per-client fixed-window rate limiting.
//!
//! Each client (keyed by source IP) carries two counters with distinct
//! horizons: a 60-second window and a 24-hour window. When either counter is
//! at its cap the request is rejected without incrementing. Windows are fixed,
//! not sliding: once the horizon passes, the counter resets and the window
//! start advances to the current instant.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::constants::rate_limiter as rl_constants;
use crate::utils::Clock;

#[async_trait]
pub trait RateLimitState: Send + Sync {
    /// Returns true if the request is admitted; both counters are then
    /// incremented. At cap, returns false and leaves the counters untouched.
    async fn check_and_record(&self, key: &str) -> bool;
    /// Manual cleanup method to remove clients idle past the day horizon
    fn cleanup_idle_clients(&self);
    /// Get current number of tracked clients for monitoring
    fn active_clients(&self) -> usize;
}

struct Window {
    count: u64,
    started_at: Instant,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self {
            count: 0,
            started_at: now,
        }
    }

    fn roll(&mut self, now: Instant, horizon: Duration) {
        if now.duration_since(self.started_at) >= horizon {
            self.count = 0;
            self.started_at = now;
        }
    }
}

struct ClientWindows {
    minute: Window,
    day: Window,
    last_access: Instant,
}

pub struct FixedWindowLimiter {
    clients: DashMap<String, Arc<RwLock<ClientWindows>>>,
    minute_cap: u64,
    day_cap: u64,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_caps(rl_constants::MINUTE_CAP, rl_constants::DAY_CAP, clock)
    }

    pub fn with_caps(minute_cap: u64, day_cap: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            clients: DashMap::new(),
            minute_cap,
            day_cap,
            clock,
        }
    }
}

#[async_trait]
impl RateLimitState for FixedWindowLimiter {
    async fn check_and_record(&self, key: &str) -> bool {
        let now = self.clock.now();

        let entry = self
            .clients
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(RwLock::new(ClientWindows {
                    minute: Window::new(now),
                    day: Window::new(now),
                    last_access: now,
                }))
            })
            .clone();

        let mut windows = entry.write().await;
        windows.last_access = now;
        windows
            .minute
            .roll(now, Duration::from_secs(rl_constants::MINUTE_WINDOW_SECONDS));
        windows
            .day
            .roll(now, Duration::from_secs(rl_constants::DAY_WINDOW_SECONDS));

        if windows.minute.count >= self.minute_cap || windows.day.count >= self.day_cap {
            return false;
        }

        windows.minute.count += 1;
        windows.day.count += 1;
        true
    }

    fn cleanup_idle_clients(&self) {
        let now = self.clock.now();
        let idle_ttl = Duration::from_secs(rl_constants::IDLE_TTL_SECONDS);

        let idle_keys: Vec<String> = self
            .clients
            .iter()
            .filter_map(|entry| {
                if let Ok(windows) = entry.value().try_read() {
                    if now.duration_since(windows.last_access) > idle_ttl {
                        return Some(entry.key().clone());
                    }
                }
                // A held lock means the client is in use; keep it.
                None
            })
            .collect();

        let removed = idle_keys.len();
        for key in &idle_keys {
            self.clients.remove(key);
        }

        if removed > 0 {
            tracing::info!("Cleaned up {} idle rate limit clients", removed);
        }
    }

    fn active_clients(&self) -> usize {
        self.clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualClock;

    fn limiter() -> (FixedWindowLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (FixedWindowLimiter::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn eleventh_request_within_a_minute_is_rejected() {
        let (limiter, _clock) = limiter();
        for _ in 0..10 {
            assert!(limiter.check_and_record("1.2.3.4").await);
        }
        assert!(!limiter.check_and_record("1.2.3.4").await);
    }

    #[tokio::test]
    async fn minute_window_resets_after_sixty_seconds() {
        let (limiter, clock) = limiter();
        for _ in 0..10 {
            assert!(limiter.check_and_record("1.2.3.4").await);
        }
        assert!(!limiter.check_and_record("1.2.3.4").await);

        clock.advance(Duration::from_secs(60));
        assert!(limiter.check_and_record("1.2.3.4").await);
    }

    #[tokio::test]
    async fn clients_are_limited_independently() {
        let (limiter, _clock) = limiter();
        for _ in 0..10 {
            assert!(limiter.check_and_record("1.2.3.4").await);
        }
        assert!(!limiter.check_and_record("1.2.3.4").await);
        assert!(limiter.check_and_record("5.6.7.8").await);
    }

    #[tokio::test]
    async fn hundred_and_first_request_within_a_day_is_rejected() {
        let (limiter, clock) = limiter();
        // 10 minute-windows of 10 requests each exhaust the day cap.
        for _ in 0..10 {
            for _ in 0..10 {
                assert!(limiter.check_and_record("1.2.3.4").await);
            }
            clock.advance(Duration::from_secs(60));
        }
        assert!(!limiter.check_and_record("1.2.3.4").await);

        // A fresh day window admits again.
        clock.advance(Duration::from_secs(rl_constants::DAY_WINDOW_SECONDS));
        assert!(limiter.check_and_record("1.2.3.4").await);
    }

    #[tokio::test]
    async fn rejected_requests_do_not_consume_day_budget() {
        let clock = Arc::new(ManualClock::new());
        let limiter = FixedWindowLimiter::with_caps(10, 20, clock.clone());

        // 15 attempts in one minute: 10 admitted, 5 rejected.
        for i in 0..15 {
            assert_eq!(limiter.check_and_record("1.2.3.4").await, i < 10);
        }

        // Day budget has 10 left, not 5.
        clock.advance(Duration::from_secs(60));
        for _ in 0..10 {
            assert!(limiter.check_and_record("1.2.3.4").await);
        }
        clock.advance(Duration::from_secs(60));
        assert!(!limiter.check_and_record("1.2.3.4").await);
    }

    #[tokio::test]
    async fn idle_clients_are_cleaned_up() {
        let (limiter, clock) = limiter();
        assert!(limiter.check_and_record("1.2.3.4").await);
        assert_eq!(limiter.active_clients(), 1);

        clock.advance(Duration::from_secs(rl_constants::IDLE_TTL_SECONDS + 1));
        limiter.cleanup_idle_clients();
        assert_eq!(limiter.active_clients(), 0);
    }
}
