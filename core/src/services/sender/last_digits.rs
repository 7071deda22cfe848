//! Synthetic sender for development and integration tests

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use vg_shared::types::language::LanguageRange;

use super::traits::VerificationCodeSender;
use crate::domain::value_objects::phone_number::PhoneNumber;
use crate::domain::value_objects::transport::{ClientType, MessageTransport};
use crate::errors::SenderError;

/// Sender whose "code" is the last six digits of the phone number
///
/// Nothing is actually delivered anywhere: the payload is derived from the
/// destination itself, so integration tests and local development can
/// verify sessions without a provider account.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastDigitsVerificationCodeSender;

impl LastDigitsVerificationCodeSender {
    pub fn new() -> Self {
        Self
    }

    /// The code this sender expects for the given number
    pub fn verification_code(phone_number: &PhoneNumber) -> String {
        phone_number.last_digits(6)
    }
}

#[async_trait]
impl VerificationCodeSender for LastDigitsVerificationCodeSender {
    fn name(&self) -> &str {
        "last-digits"
    }

    fn session_ttl(&self) -> Duration {
        Duration::from_secs(600)
    }

    fn supports(
        &self,
        _transport: MessageTransport,
        _phone_number: &PhoneNumber,
        _language_ranges: &[LanguageRange],
        _client_type: ClientType,
    ) -> bool {
        true
    }

    async fn send_verification_code(
        &self,
        transport: MessageTransport,
        phone_number: &PhoneNumber,
        _language_ranges: &[LanguageRange],
        _client_type: ClientType,
    ) -> Result<Vec<u8>, SenderError> {
        info!(
            phone = %phone_number,
            %transport,
            "Development sender issued code derived from the destination number"
        );

        Ok(Self::verification_code(phone_number).into_bytes())
    }

    async fn check_verification_code(&self, verification_code: &str, session_data: &[u8]) -> Result<bool, SenderError> {
        Ok(session_data == verification_code.as_bytes())
    }
}
