//! Sender contract

use async_trait::async_trait;
use std::time::Duration;

use vg_shared::types::language::LanguageRange;

use crate::domain::value_objects::phone_number::PhoneNumber;
use crate::domain::value_objects::transport::{ClientType, MessageTransport};
use crate::errors::SenderError;

/// A plug-in that delivers verification codes via one upstream provider
///
/// Senders are registered once at start-up and shared across all calls, so
/// implementations must be safe for concurrent use.
#[async_trait]
pub trait VerificationCodeSender: Send + Sync {
    /// Stable, unique name; persisted into sessions this sender handles
    fn name(&self) -> &str;

    /// The session lifetime this sender needs
    ///
    /// A successful send extends the session to at least this long; for
    /// delegated senders it matches the upstream session's own timeout.
    fn session_ttl(&self) -> Duration;

    /// Whether this sender can serve the given destination and client
    fn supports(
        &self,
        transport: MessageTransport,
        phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        client_type: ClientType,
    ) -> bool;

    /// Deliver a verification code
    ///
    /// Returns the opaque payload to persist on the session: the code
    /// itself for provided-code senders, an upstream session handle for
    /// delegated ones. Only this sender ever interprets the payload.
    async fn send_verification_code(
        &self,
        transport: MessageTransport,
        phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        client_type: ClientType,
    ) -> Result<Vec<u8>, SenderError>;

    /// Check a submitted code against the payload stored at send time
    ///
    /// Provided-code senders compare locally; delegated senders round-trip
    /// to the upstream.
    async fn check_verification_code(&self, verification_code: &str, session_data: &[u8]) -> Result<bool, SenderError>;
}
