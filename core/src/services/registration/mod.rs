//! Verification orchestrator
//!
//! Composes the session store, rate limiters, selection strategy, and
//! sender registry into the four public operations of the service.

pub mod config;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::RegistrationServiceConfig;
pub use service::{CheckCodeOutcome, RegistrationService};
