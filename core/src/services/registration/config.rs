//! Orchestrator configuration

use std::time::Duration;

use vg_shared::config::session::SessionConfig;

/// Tuning knobs for the verification orchestrator
#[derive(Debug, Clone)]
pub struct RegistrationServiceConfig {
    /// Lifetime of a session before its first successful send
    pub default_session_ttl: Duration,

    /// Attempts for a conflicting session update before giving up
    pub update_retry_attempts: u32,

    /// Base delay between conflicting-update retries
    pub update_retry_base_delay: Duration,

    /// Maximum random jitter added to each retry delay
    pub update_retry_jitter: Duration,

    /// Per-call timeout for upstream sender operations
    pub upstream_timeout: Duration,
}

impl Default for RegistrationServiceConfig {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for RegistrationServiceConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            default_session_ttl: Duration::from_secs(config.default_ttl_seconds),
            update_retry_attempts: config.update_retry_attempts.max(1),
            update_retry_base_delay: Duration::from_millis(config.update_retry_base_delay_ms),
            update_retry_jitter: Duration::from_millis(config.update_retry_jitter_ms),
            upstream_timeout: Duration::from_secs(config.upstream_timeout_seconds),
        }
    }
}
