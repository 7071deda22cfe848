//! Twilio Programmable Messaging sender
//!
//! Provided-code SMS sender: the code is generated locally, embedded into a
//! localized message body, and delivered via the Twilio Programmable
//! Messaging API. NANP destinations route through a dedicated messaging
//! service; everything else uses the global one.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info};
use twilio::{Client, OutboundMessage};

use vg_shared::types::language::LanguageRange;

use vg_core::domain::value_objects::phone_number::PhoneNumber;
use vg_core::domain::value_objects::transport::{ClientType, MessageTransport};
use vg_core::errors::SenderError;
use vg_core::services::sender::{
    VerificationCodeGenerator, VerificationCodeSender, VerificationSmsBodyProvider,
};

use vg_shared::config::sender::TwilioConfig;

use super::provided_code::ProvidedCodeSessionData;

/// Provided-code SMS sender on the Twilio Programmable Messaging API
pub struct TwilioMessagingServiceSmsSender {
    client: Client,
    code_generator: VerificationCodeGenerator,
    body_provider: VerificationSmsBodyProvider,
    config: TwilioConfig,
}

impl TwilioMessagingServiceSmsSender {
    pub fn new(config: TwilioConfig, body_provider: VerificationSmsBodyProvider) -> Self {
        let client = Client::new(&config.account_sid, &config.auth_token);

        Self {
            client,
            code_generator: VerificationCodeGenerator::new(),
            body_provider,
            config,
        }
    }

    fn messaging_service_sid(&self, phone_number: &PhoneNumber) -> &str {
        if phone_number.country_code() == 1 {
            &self.config.nanpa_messaging_service_sid
        } else {
            &self.config.global_messaging_service_sid
        }
    }
}

#[async_trait]
impl VerificationCodeSender for TwilioMessagingServiceSmsSender {
    fn name(&self) -> &str {
        "twilio-programmable-messaging"
    }

    fn session_ttl(&self) -> Duration {
        Duration::from_secs(600)
    }

    fn supports(
        &self,
        transport: MessageTransport,
        _phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        _client_type: ClientType,
    ) -> bool {
        transport == MessageTransport::Sms && self.body_provider.supports_language(language_ranges)
    }

    async fn send_verification_code(
        &self,
        transport: MessageTransport,
        phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        _client_type: ClientType,
    ) -> Result<Vec<u8>, SenderError> {
        if transport != MessageTransport::Sms {
            return Err(SenderError::UnsupportedTransport);
        }

        let verification_code = self.code_generator.generate();
        let body = self.body_provider.verification_body(&verification_code, language_ranges);
        let service_sid = self.messaging_service_sid(phone_number);

        debug!(phone = %phone_number, "Sending verification SMS via Twilio");

        match self
            .client
            .send_message(OutboundMessage::new(service_sid, phone_number.e164(), &body))
            .await
        {
            Ok(response) => {
                info!(phone = %phone_number, sid = %response.sid, "Twilio accepted verification SMS");
                Ok(ProvidedCodeSessionData::encode(&verification_code))
            }
            Err(err) => {
                error!(phone = %phone_number, error = %err, "Twilio rejected verification SMS");
                Err(classify_twilio_error(&err.to_string()))
            }
        }
    }

    async fn check_verification_code(&self, verification_code: &str, session_data: &[u8]) -> Result<bool, SenderError> {
        ProvidedCodeSessionData::matches(session_data, verification_code)
    }
}

/// Map a Twilio API failure onto the sender error taxonomy
///
/// The client surfaces failures as strings, so classification sniffs the
/// status code and the well-known error vocabulary.
fn classify_twilio_error(message: &str) -> SenderError {
    let lower = message.to_lowercase();

    if lower.contains("429") || lower.contains("rate") || lower.contains("too many") {
        return SenderError::Unavailable(message.to_string());
    }

    if lower.contains("500") || lower.contains("502") || lower.contains("503") || lower.contains("504") {
        return SenderError::Unavailable(message.to_string());
    }

    // 21610: unsubscribed recipient; 21612/21408: unreachable or
    // unsupported destination
    if lower.contains("21610") || lower.contains("21612") || lower.contains("21408") || lower.contains("blocked") {
        return SenderError::Rejected(message.to_string());
    }

    if lower.contains("400") || lower.contains("invalid") || lower.contains("not a valid") {
        return SenderError::IllegalArgument(message.to_string());
    }

    SenderError::Unavailable(message.to_string())
}
