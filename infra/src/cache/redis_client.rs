//! Redis client with connection retry
//!
//! Thin wrapper around a multiplexed async connection, shared by the rate
//! limiters. The multiplexed connection is cheap to clone and safe for
//! concurrent use.

use redis::aio::MultiplexedConnection;
use redis::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use vg_shared::config::cache::CacheConfig;

use crate::InfrastructureError;

/// Shared Redis connection handle
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Connect to Redis, retrying with back-off per the configuration
    pub async fn connect(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let client = Client::open(config.url.as_str()).map_err(|err| {
            error!("Failed to parse Redis URL: {}", err);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", err))
        })?;

        let mut delay = Duration::from_millis(config.connect_retry_delay_ms);
        let attempts = config.connect_retries.max(1);

        for attempt in 1..=attempts {
            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Redis connection established");
                    return Ok(Self { connection });
                }
                Err(err) if attempt < attempts => {
                    warn!(
                        "Redis connection attempt {}/{} failed: {}, retrying in {:?}",
                        attempt, attempts, err, delay
                    );
                    sleep(delay).await;
                    delay *= 2;
                }
                Err(err) => {
                    error!("Redis connection failed after {} attempts: {}", attempts, err);
                    return Err(InfrastructureError::Cache(err));
                }
            }
        }

        Err(InfrastructureError::Config("Redis connection retries exhausted".to_string()))
    }

    /// A connection handle for issuing commands
    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}
