//! # VeriGate Infrastructure
//!
//! Concrete implementations of the core contracts: the in-memory session
//! store, Redis-backed rate limiters, and the provider sender adapters
//! (Twilio Programmable Messaging, Twilio Verify, MessageBird).

/// Redis client
pub mod cache;

/// Rate limiter implementations backed by shared state
pub mod ratelimit;

/// Provider sender adapters
pub mod sender;

/// Session store implementations
pub mod store;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sender provider error
    #[error("Sender error: {0}")]
    Sender(String),
}
