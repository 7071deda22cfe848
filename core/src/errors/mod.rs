//! Error taxonomy for the verification service
//!
//! Errors come in three tiers: RPC-level faults (malformed requests,
//! cancellation, internal errors) surface as transport status codes and are
//! not modeled here; in-band errors are modeled per operation below, each
//! knowing whether the caller may retry; transient infrastructure faults
//! are retried internally and only surface after the bounded retries are
//! exhausted.

use std::time::Duration;
use thiserror::Error;

use crate::domain::entities::session::RegistrationSession;

/// Session store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live session exists for the given id (missing or expired)
    #[error("session not found")]
    NotFound,

    /// The record changed between read and conditional write
    #[error("conflicting session update")]
    Conflict,

    /// The storage backend failed transiently
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Rate limiter decisions and failures
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// The action is not permitted yet; retry after the given duration
    #[error("rate limit exceeded, retry after {retry_after:?}")]
    Exceeded { retry_after: Duration },

    /// The limiter backend failed transiently
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

/// Failures raised by verification code senders
#[derive(Debug, Error)]
pub enum SenderError {
    /// The sender does not handle the requested transport; the caller must
    /// select a different sender
    #[error("message transport not supported by this sender")]
    UnsupportedTransport,

    /// The upstream provider rejected the request as malformed
    #[error("upstream rejected the request as malformed: {0}")]
    IllegalArgument(String),

    /// The upstream provider refused for policy or destination reasons
    #[error("upstream refused the request: {0}")]
    Rejected(String),

    /// The upstream provider failed transiently
    #[error("upstream temporarily unavailable: {0}")]
    Unavailable(String),

    /// The stored session payload could not be interpreted by this sender
    #[error("stored session data could not be interpreted: {0}")]
    InvalidSessionData(String),
}

/// Failures of the `create_session` operation
#[derive(Debug, Error)]
pub enum CreateSessionError {
    /// The wire value could not be parsed as an E.164 phone number
    #[error("could not parse an E.164 phone number from the request")]
    IllegalPhoneNumber,

    /// Session creation is rate limited for this number and source
    #[error("session creation rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Internal or storage fault; surfaced at the RPC level
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures of the `send_code` operation
#[derive(Debug, Error)]
pub enum SendCodeError {
    /// No live session exists for the given id
    #[error("no session found for the given id")]
    NoSession,

    /// The session has already been verified; no further codes will be sent
    #[error("session already verified")]
    AlreadyVerified(Box<RegistrationSession>),

    /// Sending is rate limited for this number or session
    #[error("send rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// The upstream provider rejected the request as malformed
    #[error("sender rejected the request as malformed: {0}")]
    SenderIllegalArgument(String),

    /// The upstream provider refused for policy or destination reasons
    #[error("sender refused the request: {0}")]
    SenderRejected(String),

    /// No sender can currently serve the request, or the chosen sender
    /// failed transiently
    #[error("sender unavailable: {0}")]
    SenderUnavailable(String),

    /// A transient store or update-conflict fault outlived its retries
    #[error("transient fault: {0}")]
    Transient(String),
}

impl SendCodeError {
    /// Whether the caller may retry the same request after a delay
    pub fn may_retry(&self) -> bool {
        matches!(
            self,
            SendCodeError::RateLimited { .. } | SendCodeError::SenderUnavailable(_) | SendCodeError::Transient(_)
        )
    }
}

/// Failures of the `check_code` operation
#[derive(Debug, Error)]
pub enum CheckCodeError {
    /// No code has been sent for this session yet
    #[error("no code has been sent for this session")]
    NoCodeSent(Box<RegistrationSession>),

    /// Checking is rate limited for this number or session
    #[error("check rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// The upstream provider rejected the submitted code as malformed
    #[error("submitted code rejected as malformed: {0}")]
    IllegalArgument(String),

    /// Internal, store, or upstream fault; surfaced at the RPC level
    #[error("internal error: {0}")]
    Internal(String),
}
