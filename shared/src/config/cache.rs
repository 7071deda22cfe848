//! Redis cache configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Connection settings for the Redis instance backing shared rate-limit
/// state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum connection attempts at start-up
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Base delay between connection attempts, in milliseconds
    #[serde(default = "default_connect_retry_delay_ms")]
    pub connect_retry_delay_ms: u64,
}

impl CacheConfig {
    /// Load cache configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| default_url()),
            connect_retries: env::var("REDIS_CONNECT_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_connect_retries),
            connect_retry_delay_ms: env::var("REDIS_CONNECT_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_connect_retry_delay_ms),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            connect_retries: default_connect_retries(),
            connect_retry_delay_ms: default_connect_retry_delay_ms(),
        }
    }
}

fn default_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_connect_retries() -> u32 {
    3
}

fn default_connect_retry_delay_ms() -> u64 {
    100
}
