//! Handler for `getSessionMetadata`

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use vg_core::errors::StoreError;
use vg_core::repositories::session::SessionStore;

use crate::dto::registration::{
    GetSessionMetadataResponse, RegistrationError, RegistrationErrorType, SessionMetadata,
};
use crate::handlers::error::internal_error;

use super::AppState;

/// Handler for GET /v1/registration/session/{session_id}
///
/// Pure read; a missing or expired session is a `NOT_FOUND` in-band error.
pub async fn get_session_metadata<S>(state: web::Data<AppState<S>>, path: web::Path<Uuid>) -> HttpResponse
where
    S: SessionStore + 'static,
{
    match state.registration_service.get_session(path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(GetSessionMetadataResponse {
            session_metadata: Some(SessionMetadata::from(&session)),
            error: None,
        }),
        Err(StoreError::NotFound) => HttpResponse::Ok().json(GetSessionMetadataResponse {
            session_metadata: None,
            error: Some(RegistrationError::new(RegistrationErrorType::NotFound, false)),
        }),
        Err(error) => {
            log::error!("get_session failed: {}", error);
            internal_error()
        }
    }
}
