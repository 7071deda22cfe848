//! Registration procedure handlers

pub mod check_code;
pub mod create_session;
pub mod get_session;
pub mod send_code;

pub use check_code::check_verification_code;
pub use create_session::create_session;
pub use get_session::get_session_metadata;
pub use send_code::send_verification_code;

use std::sync::Arc;

use vg_core::repositories::session::SessionStore;
use vg_core::services::registration::RegistrationService;

/// Application state shared by the registration handlers
pub struct AppState<S: SessionStore> {
    pub registration_service: Arc<RegistrationService<S>>,
}
