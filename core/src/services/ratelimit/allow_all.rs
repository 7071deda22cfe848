//! Rate limiter that permits everything

use async_trait::async_trait;

use super::limiter::{RateLimitKey, RateLimiter};
use crate::errors::RateLimitError;

/// Limiter for the development profile: every check succeeds
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllRateLimiter;

#[async_trait]
impl<K: RateLimitKey> RateLimiter<K> for AllowAllRateLimiter {
    async fn check_rate_limit(&self, _key: &K) -> Result<(), RateLimitError> {
        Ok(())
    }
}
