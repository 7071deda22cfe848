//! In-process fixed-delay rate limiter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use vg_shared::config::rate_limit::LimiterSchedule;

use super::limiter::{RateLimitKey, RateLimiter};
use crate::errors::RateLimitError;

struct AttemptEntry {
    window_started: DateTime<Utc>,
    attempts: u32,
    last_attempt: DateTime<Utc>,
}

/// Rate limiter enforcing a configured schedule of delays between
/// successive attempts per key, plus a cap on attempts per window
///
/// State is in-process only; every replica enforces the schedule
/// independently. Deployments that need a shared view use the Redis
/// sliding-window limiter from the infrastructure crate instead.
pub struct FixedDelayRateLimiter {
    name: &'static str,
    schedule: LimiterSchedule,
    entries: Mutex<HashMap<Vec<String>, AttemptEntry>>,
}

impl FixedDelayRateLimiter {
    pub fn new(name: &'static str, schedule: LimiterSchedule) -> Self {
        Self {
            name,
            schedule,
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn check_at<K: RateLimitKey>(&self, key: &K, now: DateTime<Utc>) -> Result<(), RateLimitError> {
        let window = chrono::Duration::seconds(self.schedule.window_seconds as i64);
        let mut entries = self.entries.lock().await;

        // Drop keys whose window has fully elapsed so the map stays bounded
        entries.retain(|_, entry| now - entry.window_started < window);

        let entry = entries.entry(key.components()).or_insert(AttemptEntry {
            window_started: now,
            attempts: 0,
            last_attempt: now,
        });

        if now - entry.window_started >= window {
            entry.window_started = now;
            entry.attempts = 0;
        }

        if entry.attempts >= self.schedule.max_per_window {
            let retry_after = to_retry_after(entry.window_started + window - now);
            debug!(limiter = self.name, "Rate limit window exhausted");
            return Err(RateLimitError::Exceeded { retry_after });
        }

        if entry.attempts > 0 {
            if let Some(delay) = self.schedule.delay_before_attempt(entry.attempts + 1) {
                let ready_at = entry.last_attempt + chrono::Duration::seconds(delay as i64);
                if now < ready_at {
                    let retry_after = to_retry_after(ready_at - now);
                    debug!(limiter = self.name, ?retry_after, "Back-off delay not yet elapsed");
                    return Err(RateLimitError::Exceeded { retry_after });
                }
            }
        }

        entry.attempts += 1;
        entry.last_attempt = now;
        Ok(())
    }
}

fn to_retry_after(remaining: chrono::Duration) -> Duration {
    remaining.to_std().unwrap_or(Duration::from_secs(1)).max(Duration::from_secs(1))
}

#[async_trait]
impl<K: RateLimitKey> RateLimiter<K> for FixedDelayRateLimiter {
    async fn check_rate_limit(&self, key: &K) -> Result<(), RateLimitError> {
        self.check_at(key, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::phone_number::PhoneNumber;

    fn schedule(delays: Vec<u64>, max_per_window: u32, window_seconds: u64) -> LimiterSchedule {
        LimiterSchedule {
            delays_seconds: delays,
            max_per_window,
            window_seconds,
        }
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::from_e164_u64(15555550100).unwrap()
    }

    #[tokio::test]
    async fn test_first_attempt_is_permitted() {
        let limiter = FixedDelayRateLimiter::new("test", schedule(vec![60], 5, 3600));
        assert!(limiter.check_at(&phone(), Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_attempt_waits_for_delay() {
        let limiter = FixedDelayRateLimiter::new("test", schedule(vec![60], 5, 3600));
        let start = Utc::now();

        limiter.check_at(&phone(), start).await.unwrap();

        let denied = limiter.check_at(&phone(), start + chrono::Duration::seconds(10)).await;
        match denied {
            Err(RateLimitError::Exceeded { retry_after }) => {
                assert_eq!(retry_after, Duration::from_secs(50));
            }
            other => panic!("Expected rate limit denial, got {:?}", other.map(|_| ())),
        }

        assert!(limiter.check_at(&phone(), start + chrono::Duration::seconds(60)).await.is_ok());
    }

    #[tokio::test]
    async fn test_denial_does_not_consume_an_attempt() {
        let limiter = FixedDelayRateLimiter::new("test", schedule(vec![60], 5, 3600));
        let start = Utc::now();

        limiter.check_at(&phone(), start).await.unwrap();

        // Repeated denials keep reporting the same ready time
        for offset in [10, 20, 30] {
            let denied = limiter.check_at(&phone(), start + chrono::Duration::seconds(offset)).await;
            assert!(denied.is_err());
        }

        assert!(limiter.check_at(&phone(), start + chrono::Duration::seconds(60)).await.is_ok());
    }

    #[tokio::test]
    async fn test_last_delay_repeats() {
        let limiter = FixedDelayRateLimiter::new("test", schedule(vec![10, 20], 10, 3600));
        let start = Utc::now();

        let mut now = start;
        limiter.check_at(&phone(), now).await.unwrap();

        now = now + chrono::Duration::seconds(10);
        limiter.check_at(&phone(), now).await.unwrap();

        now = now + chrono::Duration::seconds(20);
        limiter.check_at(&phone(), now).await.unwrap();

        // Fourth attempt also needs the final 20 second gap
        assert!(limiter.check_at(&phone(), now + chrono::Duration::seconds(19)).await.is_err());
        assert!(limiter.check_at(&phone(), now + chrono::Duration::seconds(20)).await.is_ok());
    }

    #[tokio::test]
    async fn test_window_cap() {
        let limiter = FixedDelayRateLimiter::new("test", schedule(vec![0], 2, 600));
        let start = Utc::now();

        limiter.check_at(&phone(), start).await.unwrap();
        limiter.check_at(&phone(), start + chrono::Duration::seconds(1)).await.unwrap();

        let denied = limiter.check_at(&phone(), start + chrono::Duration::seconds(2)).await;
        match denied {
            Err(RateLimitError::Exceeded { retry_after }) => {
                assert_eq!(retry_after, Duration::from_secs(598));
            }
            other => panic!("Expected window denial, got {:?}", other.map(|_| ())),
        }

        // A fresh window permits again
        assert!(limiter.check_at(&phone(), start + chrono::Duration::seconds(600)).await.is_ok());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = FixedDelayRateLimiter::new("test", schedule(vec![60], 5, 3600));
        let now = Utc::now();

        let other = PhoneNumber::from_e164_u64(15555550199).unwrap();

        limiter.check_at(&phone(), now).await.unwrap();
        assert!(limiter.check_at(&other, now).await.is_ok());
    }
}
