//! Session payload schema shared by the provided-code senders

use serde::{Deserialize, Serialize};

use vg_core::errors::SenderError;

/// Payload stored by senders that generate the verification code locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidedCodeSessionData {
    /// The code embedded in the outgoing message
    pub verification_code: String,
}

impl ProvidedCodeSessionData {
    /// Serialize the payload for storage on the session
    pub fn encode(verification_code: &str) -> Vec<u8> {
        // Serialization of a single string field cannot fail
        serde_json::to_vec(&Self {
            verification_code: verification_code.to_string(),
        })
        .unwrap_or_default()
    }

    /// Deserialize a stored payload
    pub fn decode(session_data: &[u8]) -> Result<Self, SenderError> {
        serde_json::from_slice(session_data)
            .map_err(|err| SenderError::InvalidSessionData(err.to_string()))
    }

    /// Whether the submitted code matches the stored one
    pub fn matches(session_data: &[u8], verification_code: &str) -> Result<bool, SenderError> {
        let stored = Self::decode(session_data)?;
        Ok(stored.verification_code == verification_code)
    }
}
