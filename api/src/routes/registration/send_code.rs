//! Handler for `sendVerificationCode`

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use vg_shared::types::language::LanguageRange;

use vg_core::domain::value_objects::transport::{ClientType, MessageTransport};
use vg_core::errors::SendCodeError;
use vg_core::repositories::session::SessionStore;

use crate::dto::registration::{SendVerificationCodeRequest, SendVerificationCodeResponse, SessionMetadata};
use crate::handlers::error::{invalid_argument, map_send_code_error};

use super::AppState;

/// Handler for POST /v1/registration/session/{session_id}/code
///
/// Dispatches a verification code over the requested transport. Sender and
/// rate-limit failures come back as in-band errors with a `may_retry`
/// flag; an unknown transport is a malformed request and fails at the HTTP
/// layer.
pub async fn send_verification_code<S>(
    state: web::Data<AppState<S>>,
    path: web::Path<Uuid>,
    request: web::Json<SendVerificationCodeRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
{
    if request.0.validate().is_err() {
        return invalid_argument("invalid send-verification-code request");
    }

    let session_id = path.into_inner();

    let Ok(transport) = request.transport.parse::<MessageTransport>() else {
        return invalid_argument("unknown message transport");
    };

    let language_ranges = request
        .accept_language
        .as_deref()
        .map(LanguageRange::parse_accept_language)
        .unwrap_or_default();

    let client_type = parse_client_type(request.client_type.as_deref());

    log::info!(
        "Sending verification code for session {} via {}",
        session_id,
        transport
    );

    match state
        .registration_service
        .send_code(session_id, transport, &language_ranges, client_type)
        .await
    {
        Ok(session) => HttpResponse::Ok().json(SendVerificationCodeResponse {
            session_id,
            session_metadata: Some(SessionMetadata::from(&session)),
            error: None,
        }),
        Err(error) => {
            let session_metadata = match &error {
                SendCodeError::AlreadyVerified(session) => Some(SessionMetadata::from(session.as_ref())),
                _ => None,
            };

            HttpResponse::Ok().json(SendVerificationCodeResponse {
                session_id,
                session_metadata,
                error: Some(map_send_code_error(&error)),
            })
        }
    }
}

fn parse_client_type(value: Option<&str>) -> ClientType {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("ios") => ClientType::Ios,
        Some("android-with-fcm") => ClientType::AndroidWithFcm,
        Some("android-without-fcm") => ClientType::AndroidWithoutFcm,
        _ => ClientType::Unknown,
    }
}
