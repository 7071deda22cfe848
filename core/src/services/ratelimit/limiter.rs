//! Rate limiter contract

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::value_objects::phone_number::PhoneNumber;
use crate::errors::RateLimitError;

/// A key a rate limiter partitions its state by
///
/// Keys decompose into distinct components; backends hash each component
/// separately so a composite key can never collide with a simple key whose
/// value happens to contain a separator.
pub trait RateLimitKey: Send + Sync {
    /// The components of this key, in a fixed order
    fn components(&self) -> Vec<String>;
}

impl RateLimitKey for PhoneNumber {
    fn components(&self) -> Vec<String> {
        vec![self.e164().to_string()]
    }
}

impl RateLimitKey for Uuid {
    fn components(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl RateLimitKey for (PhoneNumber, String) {
    fn components(&self) -> Vec<String> {
        vec![self.0.e164().to_string(), self.1.clone()]
    }
}

/// Answers "may this key act now?" and, on denial, how long to wait
///
/// A permitted check consumes the attempt; a denial consumes nothing.
#[async_trait]
pub trait RateLimiter<K: RateLimitKey>: Send + Sync {
    /// Check (and on success take) a permit for the given key
    async fn check_rate_limit(&self, key: &K) -> Result<(), RateLimitError>;
}
