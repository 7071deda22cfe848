//! # VeriGate Core
//!
//! Core domain logic for the VeriGate phone-number verification service.
//! This crate contains the session entity and its state machine, the error
//! taxonomy, the store / rate-limiter / sender contracts, the sender
//! selection strategy, and the verification orchestrator that composes them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::session::{
    CheckAttempt, CheckAttemptOutcome, RegistrationSession, SendAttempt, SendAttemptOutcome,
};
pub use domain::value_objects::phone_number::PhoneNumber;
pub use domain::value_objects::transport::{ClientType, MessageTransport};
pub use errors::{
    CheckCodeError, CreateSessionError, RateLimitError, SendCodeError, SenderError, StoreError,
};
pub use repositories::session::SessionStore;
pub use services::registration::{CheckCodeOutcome, RegistrationService, RegistrationServiceConfig};
pub use services::sender::{SenderRegistry, VerificationCodeSender};
