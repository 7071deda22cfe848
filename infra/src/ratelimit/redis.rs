//! Redis-backed sliding-window rate limiter
//!
//! Every key maps to a sorted set of attempt timestamps. A check prunes
//! entries older than the window, denies when the window is full (deriving
//! retry-after from the oldest surviving entry), and otherwise records the
//! attempt. State is shared across replicas through Redis.

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use vg_shared::config::rate_limit::{LimiterSchedule, RateLimitConfig};

use vg_core::errors::RateLimitError;
use vg_core::services::ratelimit::{RateLimitKey, RateLimiter, RateLimiters};

use crate::cache::RedisClient;

/// Sliding-window limiter over a Redis sorted set per key
pub struct RedisSlidingWindowRateLimiter {
    name: &'static str,
    client: RedisClient,
    schedule: LimiterSchedule,
}

impl RedisSlidingWindowRateLimiter {
    pub fn new(name: &'static str, client: RedisClient, schedule: LimiterSchedule) -> Self {
        Self { name, client, schedule }
    }

    async fn check(&self, components: &[String]) -> Result<(), RateLimitError> {
        let key = redis_key(self.name, components);
        let mut conn = self.client.connection();

        let now = Utc::now().timestamp_millis();
        let window_ms = self.schedule.window_seconds as i64 * 1000;
        let window_start = now - window_ms;

        // Drop entries that have left the window
        let _: i64 = redis::cmd("ZREMRANGEBYSCORE")
            .arg(&key)
            .arg("-inf")
            .arg(window_start)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        let count: u32 = conn.zcount(&key, window_start, "+inf").await.map_err(unavailable)?;

        if count >= self.schedule.max_per_window {
            let oldest: Vec<(String, i64)> = conn
                .zrangebyscore_limit_withscores(&key, window_start, "+inf", 0, 1)
                .await
                .map_err(unavailable)?;

            let retry_after_ms = oldest
                .first()
                .map(|(_, timestamp)| (timestamp + window_ms - now).max(1000))
                .unwrap_or(window_ms);

            debug!(limiter = self.name, retry_after_ms, "Rate limit window exhausted");

            return Err(RateLimitError::Exceeded {
                retry_after: Duration::from_millis(retry_after_ms as u64),
            });
        }

        // Back-off between successive attempts: the newest entry decides
        // when the next attempt is permitted
        if count > 0 {
            if let Some(delay_seconds) = self.schedule.delay_before_attempt(count + 1) {
                let newest: Vec<(String, i64)> = redis::cmd("ZREVRANGEBYSCORE")
                    .arg(&key)
                    .arg("+inf")
                    .arg(window_start)
                    .arg("WITHSCORES")
                    .arg("LIMIT")
                    .arg(0)
                    .arg(1)
                    .query_async(&mut conn)
                    .await
                    .map_err(unavailable)?;

                if let Some((_, timestamp)) = newest.first() {
                    let ready_at = timestamp + delay_seconds as i64 * 1000;
                    if now < ready_at {
                        return Err(RateLimitError::Exceeded {
                            retry_after: Duration::from_millis((ready_at - now).max(1000) as u64),
                        });
                    }
                }
            }
        }

        let () = conn.zadd(&key, now.to_string(), now).await.map_err(unavailable)?;
        let () = conn
            .expire(&key, self.schedule.window_seconds as i64)
            .await
            .map_err(unavailable)?;

        Ok(())
    }
}

#[async_trait]
impl<K: RateLimitKey> RateLimiter<K> for RedisSlidingWindowRateLimiter {
    async fn check_rate_limit(&self, key: &K) -> Result<(), RateLimitError> {
        self.check(&key.components()).await
    }
}

fn unavailable(err: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(err.to_string())
}

/// Redis key for the given limiter key
///
/// Each component is hashed separately so a composite key can never
/// collide with a simple key whose value contains a separator, and so raw
/// phone numbers never appear in Redis.
fn redis_key(name: &str, components: &[String]) -> String {
    let hashed: Vec<String> = components
        .iter()
        .map(|component| {
            let mut hasher = Sha256::new();
            hasher.update(component.as_bytes());
            format!("{:x}", hasher.finalize())
        })
        .collect();

    format!("rate-limit:{}:{}", name, hashed.join(":"))
}

/// The full named-limiter bundle backed by Redis sliding windows
pub fn redis_rate_limiters(client: &RedisClient, config: &RateLimitConfig) -> RateLimiters {
    RateLimiters {
        session_creation: Arc::new(RedisSlidingWindowRateLimiter::new(
            "session-creation",
            client.clone(),
            config.session_creation.clone(),
        )),
        send_sms_per_number: Arc::new(RedisSlidingWindowRateLimiter::new(
            "send-sms-verification-code-per-number",
            client.clone(),
            config.send_sms_per_number.clone(),
        )),
        send_voice_per_number: Arc::new(RedisSlidingWindowRateLimiter::new(
            "send-voice-verification-code-per-number",
            client.clone(),
            config.send_voice_per_number.clone(),
        )),
        check_per_number: Arc::new(RedisSlidingWindowRateLimiter::new(
            "check-verification-code-per-number",
            client.clone(),
            config.check_per_number.clone(),
        )),
        send_sms_per_session: Arc::new(RedisSlidingWindowRateLimiter::new(
            "send-sms-verification-code-per-session",
            client.clone(),
            config.send_sms_per_session.clone(),
        )),
        send_voice_per_session: Arc::new(RedisSlidingWindowRateLimiter::new(
            "send-voice-verification-code-per-session",
            client.clone(),
            config.send_voice_per_session.clone(),
        )),
        check_per_session: Arc::new(RedisSlidingWindowRateLimiter::new(
            "check-verification-code-per-session",
            client.clone(),
            config.check_per_session.clone(),
        )),
    }
}
