//! Handler for `createSession`

use actix_web::{web, HttpResponse};
use validator::Validate;

use vg_core::repositories::session::SessionStore;

use crate::dto::registration::{CreateSessionRequest, CreateSessionResponse, SessionMetadata};
use crate::handlers::error::{invalid_argument, map_create_session_error};

use super::AppState;

const DEFAULT_SOURCE: &str = "unknown";

/// Handler for POST /v1/registration/session
///
/// Creates a verification session for the requested phone number. An
/// unparseable number or a rate-limit denial comes back as an in-band
/// error; only malformed request bodies fail at the HTTP layer.
pub async fn create_session<S>(
    state: web::Data<AppState<S>>,
    request: web::Json<CreateSessionRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
{
    if request.0.validate().is_err() {
        return invalid_argument("invalid create-session request");
    }

    let source = request.source.as_deref().unwrap_or(DEFAULT_SOURCE);

    match state.registration_service.create_session(request.e164, source).await {
        Ok(session) => HttpResponse::Ok().json(CreateSessionResponse {
            session_metadata: Some(SessionMetadata::from(&session)),
            error: None,
        }),
        Err(error) => match map_create_session_error(&error) {
            Ok(wire_error) => HttpResponse::Ok().json(CreateSessionResponse {
                session_metadata: None,
                error: Some(wire_error),
            }),
            Err(response) => response,
        },
    }
}
