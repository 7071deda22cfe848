//! Handler for `checkVerificationCode`

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use vg_core::errors::CheckCodeError;
use vg_core::repositories::session::SessionStore;

use crate::dto::registration::{CheckVerificationCodeRequest, CheckVerificationCodeResponse, SessionMetadata};
use crate::handlers::error::{invalid_argument, map_check_code_error};

use super::AppState;

/// Handler for PUT /v1/registration/session/{session_id}/code
///
/// Checks a submitted code. A missing or expired session answers
/// `verified=false` with no error; an empty code is a malformed request
/// and fails at the HTTP layer.
pub async fn check_verification_code<S>(
    state: web::Data<AppState<S>>,
    path: web::Path<Uuid>,
    request: web::Json<CheckVerificationCodeRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
{
    if request.0.validate().is_err() {
        return invalid_argument("verification code must not be empty");
    }

    let session_id = path.into_inner();

    match state
        .registration_service
        .check_code(session_id, &request.verification_code)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(CheckVerificationCodeResponse {
            verified: outcome.verified,
            session_metadata: outcome.session.as_ref().map(SessionMetadata::from),
            error: None,
        }),
        Err(error) => {
            let session_metadata = match &error {
                CheckCodeError::NoCodeSent(session) => Some(SessionMetadata::from(session.as_ref())),
                _ => None,
            };

            match map_check_code_error(&error) {
                Ok(wire_error) => HttpResponse::Ok().json(CheckVerificationCodeResponse {
                    verified: false,
                    session_metadata,
                    error: Some(wire_error),
                }),
                Err(response) => response,
            }
        }
    }
}
