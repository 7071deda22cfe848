//! Application factory
//!
//! Builds the actix-web application around an already-wired orchestrator.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use vg_core::repositories::session::SessionStore;

use crate::routes::registration::{
    check_verification_code, create_session, get_session_metadata, send_verification_code, AppState,
};

/// Create and configure the application with all routes
pub fn create_app<S>(
    app_state: web::Data<AppState<S>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SessionStore + 'static,
{
    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // Registration procedures
        .service(
            web::scope("/v1/registration")
                .route("/session", web::post().to(create_session::<S>))
                .route("/session/{session_id}", web::get().to(get_session_metadata::<S>))
                .route("/session/{session_id}/code", web::post().to(send_verification_code::<S>))
                .route("/session/{session_id}/code", web::put().to(check_verification_code::<S>)),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "verigate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
