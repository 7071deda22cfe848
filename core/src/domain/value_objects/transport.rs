//! Message transport and client type enumerations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport over which a verification code is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTransport {
    /// Text message
    Sms,
    /// Voice call
    Voice,
}

impl fmt::Display for MessageTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageTransport::Sms => write!(f, "sms"),
            MessageTransport::Voice => write!(f, "voice"),
        }
    }
}

impl FromStr for MessageTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sms" => Ok(MessageTransport::Sms),
            "voice" => Ok(MessageTransport::Voice),
            _ => Err(format!("Unknown message transport: {}", s)),
        }
    }
}

/// The kind of client requesting verification
///
/// Some upstream providers tailor message content by client (e.g. an app
/// hash for Android SMS retriever support), so senders receive this with
/// every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    Ios,
    AndroidWithFcm,
    AndroidWithoutFcm,
    Unknown,
}

impl Default for ClientType {
    fn default() -> Self {
        ClientType::Unknown
    }
}
