//! Mapping from the core error taxonomy onto wire errors
//!
//! Three tiers: malformed requests fail at the HTTP layer with 400 before
//! reaching the orchestrator; in-band errors land in the response body with
//! a `may_retry` flag; internal faults surface as a bare 500 with no
//! detail.

use actix_web::HttpResponse;

use vg_core::errors::{CheckCodeError, CreateSessionError, SendCodeError};

use crate::dto::registration::{RegistrationError, RegistrationErrorType};

/// In-band error payload for a `create_session` failure, or a 500 for
/// internal faults
pub fn map_create_session_error(error: &CreateSessionError) -> Result<RegistrationError, HttpResponse> {
    match error {
        CreateSessionError::IllegalPhoneNumber => {
            Ok(RegistrationError::new(RegistrationErrorType::IllegalPhoneNumber, false))
        }
        CreateSessionError::RateLimited { retry_after } => {
            Ok(RegistrationError::rate_limited(retry_after.as_secs()))
        }
        CreateSessionError::Internal(message) => {
            log::error!("create_session failed internally: {}", message);
            Err(internal_error())
        }
    }
}

/// In-band error payload for a `send_code` failure
pub fn map_send_code_error(error: &SendCodeError) -> RegistrationError {
    let may_retry = error.may_retry();

    match error {
        SendCodeError::NoSession => RegistrationError::new(RegistrationErrorType::NoSession, false),
        SendCodeError::AlreadyVerified(_) => {
            RegistrationError::new(RegistrationErrorType::SessionAlreadyVerified, false)
        }
        SendCodeError::RateLimited { retry_after } => RegistrationError::rate_limited(retry_after.as_secs()),
        SendCodeError::SenderIllegalArgument(_) => {
            RegistrationError::new(RegistrationErrorType::SenderIllegalArgument, false)
        }
        SendCodeError::SenderRejected(_) => RegistrationError::new(RegistrationErrorType::SenderRejected, false),
        SendCodeError::SenderUnavailable(_) | SendCodeError::Transient(_) => {
            RegistrationError::new(RegistrationErrorType::SenderUnavailable, may_retry)
        }
    }
}

/// In-band error payload for a `check_code` failure, or a 500 for internal
/// faults
pub fn map_check_code_error(error: &CheckCodeError) -> Result<RegistrationError, HttpResponse> {
    match error {
        CheckCodeError::NoCodeSent(_) => Ok(RegistrationError::new(RegistrationErrorType::NoCodeSent, false)),
        CheckCodeError::RateLimited { retry_after } => Ok(RegistrationError::rate_limited(retry_after.as_secs())),
        CheckCodeError::IllegalArgument(_) => {
            Ok(RegistrationError::new(RegistrationErrorType::IllegalArgument, false))
        }
        CheckCodeError::Internal(message) => {
            log::error!("check_code failed internally: {}", message);
            Err(internal_error())
        }
    }
}

/// Bare 500 response; internal detail never crosses the RPC boundary
pub fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "internal_error"
    }))
}

/// 400 response for requests that fail validation at the edge
pub fn invalid_argument(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "invalid_argument",
        "message": message,
    }))
}
