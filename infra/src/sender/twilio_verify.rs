//! Twilio Verify sender
//!
//! Delegated sender: Twilio Verify generates, delivers, and later validates
//! the code. The session payload holds the upstream verification SID, and
//! every check round-trips to the VerificationCheck endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use vg_shared::config::sender::TwilioConfig;
use vg_shared::types::language::{lookup_tag, LanguageRange};

use vg_core::domain::value_objects::phone_number::PhoneNumber;
use vg_core::domain::value_objects::transport::{ClientType, MessageTransport};
use vg_core::errors::SenderError;
use vg_core::services::sender::VerificationCodeSender;

use crate::InfrastructureError;

const DEFAULT_BASE_URL: &str = "https://verify.twilio.com/v2";

/// Payload stored for sessions handled by Twilio Verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TwilioVerifySessionData {
    verification_sid: String,
}

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct VerificationCheckResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    valid: Option<bool>,
}

/// Delegated sender on the Twilio Verify v2 API
pub struct TwilioVerifySender {
    http: reqwest::Client,
    config: TwilioConfig,
    supported_languages: Vec<String>,
    base_url: String,
}

impl TwilioVerifySender {
    pub fn new(
        config: TwilioConfig,
        supported_languages: Vec<String>,
        request_timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            http,
            config,
            supported_languages,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    fn channel(transport: MessageTransport) -> &'static str {
        match transport {
            MessageTransport::Sms => "sms",
            MessageTransport::Voice => "call",
        }
    }
}

#[async_trait]
impl VerificationCodeSender for TwilioVerifySender {
    fn name(&self) -> &str {
        "twilio-verify"
    }

    fn session_ttl(&self) -> Duration {
        // Upstream Verify sessions time out after ten minutes
        Duration::from_secs(600)
    }

    fn supports(
        &self,
        _transport: MessageTransport,
        _phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        _client_type: ClientType,
    ) -> bool {
        language_ranges.is_empty() || lookup_tag(language_ranges, &self.supported_languages).is_some()
    }

    async fn send_verification_code(
        &self,
        transport: MessageTransport,
        phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        client_type: ClientType,
    ) -> Result<Vec<u8>, SenderError> {
        let url = format!("{}/Services/{}/Verifications", self.base_url, self.config.verify_service_sid);

        let mut params: Vec<(&str, String)> = vec![
            ("To", phone_number.e164().to_string()),
            ("Channel", Self::channel(transport).to_string()),
        ];

        if let Some(locale) = lookup_tag(language_ranges, &self.supported_languages) {
            params.push(("Locale", locale.to_string()));
        }

        if client_type == ClientType::AndroidWithFcm {
            if let Some(app_hash) = &self.config.android_app_hash {
                params.push(("AppHash", app_hash.clone()));
            }
        }

        debug!(phone = %phone_number, channel = Self::channel(transport), "Creating Twilio Verify verification");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|err| SenderError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(phone = %phone_number, %status, "Twilio Verify refused verification request");
            return Err(classify_status(status.as_u16(), detail));
        }

        let verification: VerificationResponse = response
            .json()
            .await
            .map_err(|err| SenderError::Unavailable(err.to_string()))?;

        info!(phone = %phone_number, sid = %verification.sid, "Twilio Verify accepted verification request");

        serde_json::to_vec(&TwilioVerifySessionData {
            verification_sid: verification.sid,
        })
        .map_err(|err| SenderError::Unavailable(err.to_string()))
    }

    async fn check_verification_code(&self, verification_code: &str, session_data: &[u8]) -> Result<bool, SenderError> {
        let stored: TwilioVerifySessionData = serde_json::from_slice(session_data)
            .map_err(|err| SenderError::InvalidSessionData(err.to_string()))?;

        let url = format!(
            "{}/Services/{}/VerificationCheck",
            self.base_url, self.config.verify_service_sid
        );

        let params: Vec<(&str, String)> = vec![
            ("VerificationSid", stored.verification_sid.clone()),
            ("Code", verification_code.to_string()),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|err| SenderError::Unavailable(err.to_string()))?;

        let status = response.status();

        // The upstream verification lapsed or was already consumed; the
        // submitted code cannot be accepted anymore
        if status.as_u16() == 404 {
            warn!(sid = %stored.verification_sid, "Twilio Verify verification no longer exists");
            return Ok(false);
        }

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), detail));
        }

        let check: VerificationCheckResponse = response
            .json()
            .await
            .map_err(|err| SenderError::Unavailable(err.to_string()))?;

        Ok(check.valid.unwrap_or_else(|| check.status.as_deref() == Some("approved")))
    }
}

/// Map an upstream HTTP status onto the sender error taxonomy
fn classify_status(status: u16, detail: String) -> SenderError {
    match status {
        400 | 422 => SenderError::IllegalArgument(detail),
        401 | 403 | 404 => SenderError::Rejected(detail),
        429 => SenderError::Unavailable(detail),
        _ if status >= 500 => SenderError::Unavailable(detail),
        _ => SenderError::Unavailable(detail),
    }
}
