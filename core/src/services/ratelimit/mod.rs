//! Rate limiting
//!
//! Seven named limiters guard the verification flow, each with its own key
//! shape and decay schedule. The orchestrator consults number-scoped
//! limiters before session-scoped ones and surfaces the first denial; a
//! denial never consumes an attempt from later limiters and never mutates
//! session state.

pub mod allow_all;
pub mod fixed_delay;
pub mod limiter;

pub use allow_all::AllowAllRateLimiter;
pub use fixed_delay::FixedDelayRateLimiter;
pub use limiter::{RateLimitKey, RateLimiter};

use std::sync::Arc;
use uuid::Uuid;

use vg_shared::config::rate_limit::RateLimitConfig;

use crate::domain::value_objects::phone_number::PhoneNumber;
use crate::domain::value_objects::transport::MessageTransport;

/// The named limiters consulted by the verification orchestrator
#[derive(Clone)]
pub struct RateLimiters {
    /// `session-creation`, keyed by (phone number, source tag)
    pub session_creation: Arc<dyn RateLimiter<(PhoneNumber, String)>>,

    /// `send-sms-verification-code-per-number`
    pub send_sms_per_number: Arc<dyn RateLimiter<PhoneNumber>>,

    /// `send-voice-verification-code-per-number`
    pub send_voice_per_number: Arc<dyn RateLimiter<PhoneNumber>>,

    /// `check-verification-code-per-number`
    pub check_per_number: Arc<dyn RateLimiter<PhoneNumber>>,

    /// `send-sms-verification-code-per-session`
    pub send_sms_per_session: Arc<dyn RateLimiter<Uuid>>,

    /// `send-voice-verification-code-per-session`
    pub send_voice_per_session: Arc<dyn RateLimiter<Uuid>>,

    /// `check-verification-code-per-session`
    pub check_per_session: Arc<dyn RateLimiter<Uuid>>,
}

impl RateLimiters {
    /// Limiters that permit everything; development profile only
    pub fn allow_all() -> Self {
        Self {
            session_creation: Arc::new(AllowAllRateLimiter),
            send_sms_per_number: Arc::new(AllowAllRateLimiter),
            send_voice_per_number: Arc::new(AllowAllRateLimiter),
            check_per_number: Arc::new(AllowAllRateLimiter),
            send_sms_per_session: Arc::new(AllowAllRateLimiter),
            send_voice_per_session: Arc::new(AllowAllRateLimiter),
            check_per_session: Arc::new(AllowAllRateLimiter),
        }
    }

    /// In-process fixed-delay limiters built from the configured schedules
    pub fn fixed_delay(config: &RateLimitConfig) -> Self {
        Self {
            session_creation: Arc::new(FixedDelayRateLimiter::new(
                "session-creation",
                config.session_creation.clone(),
            )),
            send_sms_per_number: Arc::new(FixedDelayRateLimiter::new(
                "send-sms-verification-code-per-number",
                config.send_sms_per_number.clone(),
            )),
            send_voice_per_number: Arc::new(FixedDelayRateLimiter::new(
                "send-voice-verification-code-per-number",
                config.send_voice_per_number.clone(),
            )),
            check_per_number: Arc::new(FixedDelayRateLimiter::new(
                "check-verification-code-per-number",
                config.check_per_number.clone(),
            )),
            send_sms_per_session: Arc::new(FixedDelayRateLimiter::new(
                "send-sms-verification-code-per-session",
                config.send_sms_per_session.clone(),
            )),
            send_voice_per_session: Arc::new(FixedDelayRateLimiter::new(
                "send-voice-verification-code-per-session",
                config.send_voice_per_session.clone(),
            )),
            check_per_session: Arc::new(FixedDelayRateLimiter::new(
                "check-verification-code-per-session",
                config.check_per_session.clone(),
            )),
        }
    }

    /// The number-scoped send limiter for the given transport
    pub fn send_per_number(&self, transport: MessageTransport) -> &Arc<dyn RateLimiter<PhoneNumber>> {
        match transport {
            MessageTransport::Sms => &self.send_sms_per_number,
            MessageTransport::Voice => &self.send_voice_per_number,
        }
    }

    /// The session-scoped send limiter for the given transport
    pub fn send_per_session(&self, transport: MessageTransport) -> &Arc<dyn RateLimiter<Uuid>> {
        match transport {
            MessageTransport::Sms => &self.send_sms_per_session,
            MessageTransport::Voice => &self.send_voice_per_session,
        }
    }
}
