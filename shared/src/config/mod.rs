//! Configuration module with service-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection (development / staging / production)
//! - `server` - TCP bind address for the RPC surface
//! - `session` - Session lifetime, CAS retry, and upstream timeout settings
//! - `rate_limit` - Schedules for the named rate limiters
//! - `sender` - Provider credentials and the sender routing table

pub mod cache;
pub mod environment;
pub mod rate_limit;
pub mod sender;
pub mod server;
pub mod session;

use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use environment::Environment;
pub use rate_limit::{LimiterSchedule, RateLimitConfig};
pub use sender::{MessageBirdConfig, SenderConfig, TwilioConfig};
pub use server::ServerConfig;
pub use session::SessionConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment the service is running in
    pub environment: Environment,

    /// Server bind configuration
    pub server: ServerConfig,

    /// Session lifecycle configuration
    pub session: SessionConfig,

    /// Rate limiter schedules
    pub rate_limit: RateLimitConfig,

    /// Redis connection settings for shared rate-limit state
    pub cache: CacheConfig,

    /// Sender credentials and routing
    pub sender: SenderConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    ///
    /// Profile-dependent defaults are applied first; individual values may
    /// then be overridden through the environment.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();

        Self {
            environment,
            server: ServerConfig::from_env(),
            session: SessionConfig::from_env(),
            rate_limit: if environment.is_development() {
                RateLimitConfig::development()
            } else {
                RateLimitConfig::production()
            },
            cache: CacheConfig::from_env(),
            sender: SenderConfig::from_env(),
        }
    }
}
