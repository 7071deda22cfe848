//! Registration procedure messages
//!
//! Responses follow a oneof shape: exactly one of `session_metadata` or
//! `error` is present (both optional fields at the serialization level).
//! Malformed requests never produce these in-band errors; they fail at the
//! HTTP layer with a 400.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use vg_core::domain::entities::session::RegistrationSession;

/// Session metadata returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Opaque session identifier
    pub session_id: Uuid,

    /// The phone number under verification, wire format
    pub e164: u64,

    /// Whether the session has been verified
    pub verified: bool,
}

impl From<&RegistrationSession> for SessionMetadata {
    fn from(session: &RegistrationSession) -> Self {
        Self {
            session_id: session.id,
            e164: session.phone_number.to_e164_u64(),
            verified: session.is_verified(),
        }
    }
}

/// Kinds of in-band errors across the four procedures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationErrorType {
    RateLimited,
    IllegalPhoneNumber,
    NotFound,
    SessionAlreadyVerified,
    NoSession,
    SenderRejected,
    SenderIllegalArgument,
    SenderUnavailable,
    NoCodeSent,
    SessionNotFound,
    IllegalArgument,
}

/// In-band error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationError {
    /// What went wrong
    pub error_type: RegistrationErrorType,

    /// Whether retrying the same request after a delay can succeed
    pub may_retry: bool,

    /// Seconds to wait before retrying, for rate-limit denials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl RegistrationError {
    pub fn new(error_type: RegistrationErrorType, may_retry: bool) -> Self {
        Self {
            error_type,
            may_retry,
            retry_after_seconds: None,
        }
    }

    pub fn rate_limited(retry_after_seconds: u64) -> Self {
        Self {
            error_type: RegistrationErrorType::RateLimited,
            may_retry: true,
            retry_after_seconds: Some(retry_after_seconds),
        }
    }
}

/// Request body for `createSession`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Phone number in wire format: country code and subscriber digits as a
    /// single integer, no leading `+`
    pub e164: u64,

    /// Tag describing where the request originated, used in rate-limit
    /// keys
    #[validate(length(max = 64))]
    #[serde(default)]
    pub source: Option<String>,
}

/// Response body for `createSession`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_metadata: Option<SessionMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RegistrationError>,
}

/// Response body for `getSessionMetadata`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSessionMetadataResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_metadata: Option<SessionMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RegistrationError>,
}

/// Request body for `sendVerificationCode`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendVerificationCodeRequest {
    /// Delivery transport: `sms` or `voice`
    #[validate(length(min = 1, max = 16))]
    pub transport: String,

    /// Accept-Language style list of caller language preferences
    #[serde(default)]
    pub accept_language: Option<String>,

    /// Kind of client requesting verification
    #[serde(default)]
    pub client_type: Option<String>,
}

/// Response body for `sendVerificationCode`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendVerificationCodeResponse {
    /// Echo of the session the send was attempted for
    pub session_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_metadata: Option<SessionMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RegistrationError>,
}

/// Request body for `checkVerificationCode`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckVerificationCodeRequest {
    /// The code the user entered
    #[validate(length(min = 1, max = 32))]
    pub verification_code: String,
}

/// Response body for `checkVerificationCode`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckVerificationCodeResponse {
    /// Whether the submitted code verified the session
    pub verified: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_metadata: Option<SessionMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RegistrationError>,
}
