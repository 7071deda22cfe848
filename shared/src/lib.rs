//! # VeriGate Shared
//!
//! Cross-cutting configuration, types, and utilities shared by the core,
//! infrastructure, and API layers of the VeriGate verification service.

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::environment::Environment;
pub use config::rate_limit::{LimiterSchedule, RateLimitConfig};
pub use config::sender::SenderConfig;
pub use config::server::ServerConfig;
pub use config::session::SessionConfig;
pub use types::language::LanguageRange;
