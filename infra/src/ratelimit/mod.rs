//! Rate limiter implementations backed by shared state

pub mod redis;

pub use redis::{redis_rate_limiters, RedisSlidingWindowRateLimiter};
