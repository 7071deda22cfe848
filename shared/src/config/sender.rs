//! Sender credentials and routing configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Twilio credentials shared by the Programmable Messaging and Verify
/// senders
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,

    /// Twilio Auth Token
    pub auth_token: String,

    /// Messaging service SID used for NANP (+1) destinations
    pub nanpa_messaging_service_sid: String,

    /// Messaging service SID used for all other destinations
    pub global_messaging_service_sid: String,

    /// Twilio Verify service SID
    pub verify_service_sid: String,

    /// App hash appended to Verify SMS bodies for Android retriever clients
    #[serde(default)]
    pub android_app_hash: Option<String>,
}

impl TwilioConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Option<Self> {
        let account_sid = env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = env::var("TWILIO_AUTH_TOKEN").ok()?;

        Some(Self {
            account_sid,
            auth_token,
            nanpa_messaging_service_sid: env::var("TWILIO_NANPA_MESSAGING_SERVICE_SID").unwrap_or_default(),
            global_messaging_service_sid: env::var("TWILIO_GLOBAL_MESSAGING_SERVICE_SID").unwrap_or_default(),
            verify_service_sid: env::var("TWILIO_VERIFY_SERVICE_SID").unwrap_or_default(),
            android_app_hash: env::var("TWILIO_ANDROID_APP_HASH").ok(),
        })
    }
}

/// MessageBird credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageBirdConfig {
    /// MessageBird access key
    pub access_key: String,

    /// Originator (sender id or number) for outbound messages
    pub originator: String,
}

impl MessageBirdConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Option<Self> {
        let access_key = env::var("MESSAGEBIRD_ACCESS_KEY").ok()?;

        Some(Self {
            access_key,
            originator: env::var("MESSAGEBIRD_ORIGINATOR").unwrap_or_else(|_| "VeriGate".to_string()),
        })
    }
}

/// Sender registry and selection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SenderConfig {
    /// Name of the sender used when no routing entry matches
    #[serde(default = "default_sender_name")]
    pub default_sender: String,

    /// SMS routing table: country calling code -> sender name
    #[serde(default)]
    pub sms_routes: HashMap<String, String>,

    /// Voice routing table: country calling code -> sender name
    #[serde(default)]
    pub voice_routes: HashMap<String, String>,

    /// Language tags the provided-code message templates support
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,

    /// Per-request timeout for provider REST calls, in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Twilio credentials, if configured
    #[serde(default)]
    pub twilio: Option<TwilioConfig>,

    /// MessageBird credentials, if configured
    #[serde(default)]
    pub messagebird: Option<MessageBirdConfig>,
}

impl SenderConfig {
    /// Load sender configuration from environment variables
    ///
    /// Routing tables are read as comma-separated `code=sender` pairs, e.g.
    /// `SENDER_SMS_ROUTES=1=twilio-programmable-messaging,44=messagebird`.
    pub fn from_env() -> Self {
        Self {
            default_sender: env::var("SENDER_DEFAULT").unwrap_or_else(|_| default_sender_name()),
            sms_routes: parse_routes(env::var("SENDER_SMS_ROUTES").ok().as_deref()),
            voice_routes: parse_routes(env::var("SENDER_VOICE_ROUTES").ok().as_deref()),
            supported_languages: env::var("SENDER_SUPPORTED_LANGUAGES")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| default_supported_languages()),
            request_timeout_seconds: env::var("SENDER_REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout_seconds),
            twilio: TwilioConfig::from_env(),
            messagebird: MessageBirdConfig::from_env(),
        }
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            default_sender: default_sender_name(),
            sms_routes: HashMap::new(),
            voice_routes: HashMap::new(),
            supported_languages: default_supported_languages(),
            request_timeout_seconds: default_request_timeout_seconds(),
            twilio: None,
            messagebird: None,
        }
    }
}

fn parse_routes(value: Option<&str>) -> HashMap<String, String> {
    let mut routes = HashMap::new();

    if let Some(value) = value {
        for pair in value.split(',') {
            if let Some((code, sender)) = pair.split_once('=') {
                let (code, sender) = (code.trim(), sender.trim());
                if !code.is_empty() && !sender.is_empty() {
                    routes.insert(code.to_string(), sender.to_string());
                }
            }
        }
    }

    routes
}

fn default_sender_name() -> String {
    "twilio-verify".to_string()
}

fn default_supported_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_request_timeout_seconds() -> u64 {
    10
}
