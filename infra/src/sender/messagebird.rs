//! MessageBird SMS sender
//!
//! Provided-code SMS sender on the MessageBird messages REST API.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

use vg_shared::config::sender::MessageBirdConfig;
use vg_shared::types::language::LanguageRange;

use vg_core::domain::value_objects::phone_number::PhoneNumber;
use vg_core::domain::value_objects::transport::{ClientType, MessageTransport};
use vg_core::errors::SenderError;
use vg_core::services::sender::{
    VerificationCodeGenerator, VerificationCodeSender, VerificationSmsBodyProvider,
};

use crate::InfrastructureError;

use super::provided_code::ProvidedCodeSessionData;

const DEFAULT_BASE_URL: &str = "https://rest.messagebird.com";

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    originator: &'a str,
    recipients: Vec<String>,
    body: String,
}

/// Provided-code SMS sender on the MessageBird API
pub struct MessageBirdSmsSender {
    http: reqwest::Client,
    config: MessageBirdConfig,
    code_generator: VerificationCodeGenerator,
    body_provider: VerificationSmsBodyProvider,
    base_url: String,
}

impl MessageBirdSmsSender {
    pub fn new(
        config: MessageBirdConfig,
        body_provider: VerificationSmsBodyProvider,
        request_timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            http,
            config,
            code_generator: VerificationCodeGenerator::new(),
            body_provider,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }
}

#[async_trait]
impl VerificationCodeSender for MessageBirdSmsSender {
    fn name(&self) -> &str {
        "messagebird"
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

        let request = MessageRequest {
            originator: &self.config.originator,
            // MessageBird takes recipients as bare MSISDNs
            recipients: vec![phone_number.to_e164_u64().to_string()],
            body,
        };

        debug!(phone = %phone_number, "Sending verification SMS via MessageBird");

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("Authorization", format!("AccessKey {}", self.config.access_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| SenderError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(phone = %phone_number, %status, "MessageBird refused verification SMS");
            return Err(classify_status(status.as_u16(), detail));
        }

        info!(phone = %phone_number, "MessageBird accepted verification SMS");

        Ok(ProvidedCodeSessionData::encode(&verification_code))
    }

    async fn check_verification_code(&self, verification_code: &str, session_data: &[u8]) -> Result<bool, SenderError> {
        ProvidedCodeSessionData::matches(session_data, verification_code)
    }
}

/// Map an upstream HTTP status onto the sender error taxonomy
fn classify_status(status: u16, detail: String) -> SenderError {
    match status {
        400 | 422 => SenderError::IllegalArgument(detail),
        401 | 403 => SenderError::Rejected(detail),
        429 => SenderError::Unavailable(detail),
        _ if status >= 500 => SenderError::Unavailable(detail),
        _ => SenderError::Unavailable(detail),
    }
}
