//! Session lifecycle configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for session lifetimes, conflicting-update retries, and
/// upstream call timeouts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Lifetime of a freshly created session, in seconds
    ///
    /// A successful send extends the session to the sender's own TTL; this
    /// value only has to cover the window between creation and the first
    /// send.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// Maximum number of attempts for a conflicting session update before
    /// the conflict is surfaced as a transient error
    #[serde(default = "default_update_retry_attempts")]
    pub update_retry_attempts: u32,

    /// Base delay between conflicting-update retries, in milliseconds
    #[serde(default = "default_update_retry_base_delay_ms")]
    pub update_retry_base_delay_ms: u64,

    /// Maximum random jitter added to each retry delay, in milliseconds
    #[serde(default = "default_update_retry_jitter_ms")]
    pub update_retry_jitter_ms: u64,

    /// Per-call timeout for upstream sender and store operations, in seconds
    #[serde(default = "default_upstream_timeout_seconds")]
    pub upstream_timeout_seconds: u64,

    /// Interval between expired-session sweeps of the in-memory store, in
    /// seconds
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

impl SessionConfig {
    /// Load session configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_ttl_seconds: env_or("SESSION_DEFAULT_TTL_SECONDS", default_ttl_seconds()),
            update_retry_attempts: env_or("SESSION_UPDATE_RETRY_ATTEMPTS", default_update_retry_attempts()),
            update_retry_base_delay_ms: env_or(
                "SESSION_UPDATE_RETRY_BASE_DELAY_MS",
                default_update_retry_base_delay_ms(),
            ),
            update_retry_jitter_ms: env_or("SESSION_UPDATE_RETRY_JITTER_MS", default_update_retry_jitter_ms()),
            upstream_timeout_seconds: env_or("UPSTREAM_TIMEOUT_SECONDS", default_upstream_timeout_seconds()),
            sweep_interval_seconds: env_or("SESSION_SWEEP_INTERVAL_SECONDS", default_sweep_interval_seconds()),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_ttl_seconds(),
            update_retry_attempts: default_update_retry_attempts(),
            update_retry_base_delay_ms: default_update_retry_base_delay_ms(),
            update_retry_jitter_ms: default_update_retry_jitter_ms(),
            upstream_timeout_seconds: default_upstream_timeout_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(fallback)
}

fn default_ttl_seconds() -> u64 {
    600 // 10 minutes
}

fn default_update_retry_attempts() -> u32 {
    3
}

fn default_update_retry_base_delay_ms() -> u64 {
    50
}

fn default_update_retry_jitter_ms() -> u64 {
    50
}

fn default_upstream_timeout_seconds() -> u64 {
    10
}

fn default_sweep_interval_seconds() -> u64 {
    60
}
