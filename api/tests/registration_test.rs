//! End-to-end tests of the registration procedures
//!
//! Runs the full stack over the development wiring: in-memory store,
//! last-digits sender, all-allow rate limiters.

use actix_web::{http::StatusCode, test, web};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use vg_shared::config::sender::SenderConfig;
use vg_shared::types::language::LanguageRange;

use vg_core::domain::value_objects::phone_number::PhoneNumber;
use vg_core::domain::value_objects::transport::{ClientType, MessageTransport};
use vg_core::errors::{RateLimitError, SenderError};
use vg_core::services::ratelimit::{RateLimitKey, RateLimiter, RateLimiters};
use vg_core::services::registration::{RegistrationService, RegistrationServiceConfig};
use vg_core::services::selection::ConfiguredSelectionStrategy;
use vg_core::services::sender::{
    LastDigitsVerificationCodeSender, SenderRegistry, VerificationCodeSender,
};

use vg_infra::store::InMemorySessionStore;

use vg_api::app::create_app;
use vg_api::dto::registration::{
    CheckVerificationCodeResponse, CreateSessionResponse, GetSessionMetadataResponse,
    RegistrationErrorType, SendVerificationCodeResponse,
};
use vg_api::routes::registration::AppState;

const PHONE: u64 = 15555550100;

// Sender stub that refuses every request for policy reasons
struct RejectingSender;

#[async_trait]
impl VerificationCodeSender for RejectingSender {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn session_ttl(&self) -> Duration {
        Duration::from_secs(600)
    }

    fn supports(
        &self,
        _transport: MessageTransport,
        _phone_number: &PhoneNumber,
        _language_ranges: &[LanguageRange],
        _client_type: ClientType,
    ) -> bool {
        true
    }

    async fn send_verification_code(
        &self,
        _transport: MessageTransport,
        _phone_number: &PhoneNumber,
        _language_ranges: &[LanguageRange],
        _client_type: ClientType,
    ) -> Result<Vec<u8>, SenderError> {
        Err(SenderError::Rejected("destination refused".to_string()))
    }

    async fn check_verification_code(&self, _verification_code: &str, _session_data: &[u8]) -> Result<bool, SenderError> {
        Ok(false)
    }
}

// Rate limiter that denies everything with a fixed retry-after
struct DenyRateLimiter(Duration);

#[async_trait]
impl<K: RateLimitKey> RateLimiter<K> for DenyRateLimiter {
    async fn check_rate_limit(&self, _key: &K) -> Result<(), RateLimitError> {
        Err(RateLimitError::Exceeded { retry_after: self.0 })
    }
}

fn test_state(
    senders: Vec<Arc<dyn VerificationCodeSender>>,
    rate_limiters: RateLimiters,
) -> web::Data<AppState<InMemorySessionStore>> {
    let store = Arc::new(InMemorySessionStore::new());
    let registry = Arc::new(SenderRegistry::new(senders).unwrap());

    let mut sender_config = SenderConfig::default();
    sender_config.default_sender = registry.names()[0].to_string();

    let strategy = Arc::new(ConfiguredSelectionStrategy::new(registry.clone(), &sender_config));

    let registration_service = Arc::new(RegistrationService::new(
        store,
        registry,
        strategy,
        rate_limiters,
        RegistrationServiceConfig::default(),
    ));

    web::Data::new(AppState { registration_service })
}

fn development_state() -> web::Data<AppState<InMemorySessionStore>> {
    test_state(
        vec![Arc::new(LastDigitsVerificationCodeSender::new())],
        RateLimiters::allow_all(),
    )
}

#[actix_web::test]
async fn test_happy_path() {
    let app = test::init_service(create_app(development_state())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/registration/session")
            .set_json(serde_json::json!({ "e164": PHONE }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: CreateSessionResponse = test::read_body_json(resp).await;
    assert!(body.error.is_none());
    let metadata = body.session_metadata.unwrap();
    assert_eq!(metadata.e164, PHONE);
    assert!(!metadata.verified);

    let session_id = metadata.session_id;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/v1/registration/session/{}/code", session_id))
            .set_json(serde_json::json!({ "transport": "sms" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: SendVerificationCodeResponse = test::read_body_json(resp).await;
    assert!(body.error.is_none());
    assert_eq!(body.session_id, session_id);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/v1/registration/session/{}/code", session_id))
            .set_json(serde_json::json!({ "verification_code": "550100" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: CheckVerificationCodeResponse = test::read_body_json(resp).await;
    assert!(body.verified);
    assert!(body.error.is_none());
    assert!(body.session_metadata.unwrap().verified);

    // Checking the same code again stays verified
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/v1/registration/session/{}/code", session_id))
            .set_json(serde_json::json!({ "verification_code": "550100" }))
            .to_request(),
    )
    .await;

    let body: CheckVerificationCodeResponse = test::read_body_json(resp).await;
    assert!(body.verified);
}

#[actix_web::test]
async fn test_wrong_code() {
    let app = test::init_service(create_app(development_state())).await;

    let body: CreateSessionResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/v1/registration/session")
                .set_json(serde_json::json!({ "e164": PHONE }))
                .to_request(),
        )
        .await,
    )
    .await;
    let session_id = body.session_metadata.unwrap().session_id;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/v1/registration/session/{}/code", session_id))
            .set_json(serde_json::json!({ "transport": "sms" }))
            .to_request(),
    )
    .await;

    let body: CheckVerificationCodeResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/v1/registration/session/{}/code", session_id))
                .set_json(serde_json::json!({ "verification_code": "incorrect" }))
                .to_request(),
        )
        .await,
    )
    .await;

    assert!(!body.verified);
    assert!(body.error.is_none());
}

#[actix_web::test]
async fn test_rate_limited_session_creation() {
    let mut rate_limiters = RateLimiters::allow_all();
    rate_limiters.session_creation = Arc::new(DenyRateLimiter(Duration::from_secs(60)));

    let state = test_state(vec![Arc::new(LastDigitsVerificationCodeSender::new())], rate_limiters);
    let app = test::init_service(create_app(state)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/v1/registration/session")
            .set_json(serde_json::json!({ "e164": PHONE }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: CreateSessionResponse = test::read_body_json(resp).await;
    assert!(body.session_metadata.is_none());

    let error = body.error.unwrap();
    assert_eq!(error.error_type, RegistrationErrorType::RateLimited);
    assert!(error.may_retry);
    assert_eq!(error.retry_after_seconds, Some(60));
}

#[actix_web::test]
async fn test_illegal_phone_number() {
    let app = test::init_service(create_app(development_state())).await;

    let body: CreateSessionResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/v1/registration/session")
                .set_json(serde_json::json!({ "e164": 0 }))
                .to_request(),
        )
        .await,
    )
    .await;

    let error = body.error.unwrap();
    assert_eq!(error.error_type, RegistrationErrorType::IllegalPhoneNumber);
    assert!(!error.may_retry);
}

#[actix_web::test]
async fn test_unknown_session_metadata() {
    let app = test::init_service(create_app(development_state())).await;

    let body: GetSessionMetadataResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/v1/registration/session/{}", uuid::Uuid::new_v4()))
                .to_request(),
        )
        .await,
    )
    .await;

    assert!(body.session_metadata.is_none());
    assert_eq!(body.error.unwrap().error_type, RegistrationErrorType::NotFound);
}

#[actix_web::test]
async fn test_send_after_verified() {
    let app = test::init_service(create_app(development_state())).await;

    let body: CreateSessionResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/v1/registration/session")
                .set_json(serde_json::json!({ "e164": PHONE }))
                .to_request(),
        )
        .await,
    )
    .await;
    let session_id = body.session_metadata.unwrap().session_id;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/v1/registration/session/{}/code", session_id))
            .set_json(serde_json::json!({ "transport": "sms" }))
            .to_request(),
    )
    .await;

    let body: CheckVerificationCodeResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/v1/registration/session/{}/code", session_id))
                .set_json(serde_json::json!({ "verification_code": "550100" }))
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(body.verified);

    let body: SendVerificationCodeResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/v1/registration/session/{}/code", session_id))
                .set_json(serde_json::json!({ "transport": "sms" }))
                .to_request(),
        )
        .await,
    )
    .await;

    let error = body.error.unwrap();
    assert_eq!(error.error_type, RegistrationErrorType::SessionAlreadyVerified);
    assert!(!error.may_retry);

    let metadata = body.session_metadata.unwrap();
    assert_eq!(metadata.session_id, session_id);
    assert!(metadata.verified);
}

#[actix_web::test]
async fn test_sender_rejects() {
    let state = test_state(vec![Arc::new(RejectingSender)], RateLimiters::allow_all());
    let app = test::init_service(create_app(state)).await;

    let body: CreateSessionResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/v1/registration/session")
                .set_json(serde_json::json!({ "e164": PHONE }))
                .to_request(),
        )
        .await,
    )
    .await;
    let session_id = body.session_metadata.unwrap().session_id;

    let body: SendVerificationCodeResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/v1/registration/session/{}/code", session_id))
                .set_json(serde_json::json!({ "transport": "sms" }))
                .to_request(),
        )
        .await,
    )
    .await;

    let error = body.error.unwrap();
    assert_eq!(error.error_type, RegistrationErrorType::SenderRejected);
    assert!(!error.may_retry);
}

#[actix_web::test]
async fn test_check_before_send() {
    let app = test::init_service(create_app(development_state())).await;

    let body: CreateSessionResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/v1/registration/session")
                .set_json(serde_json::json!({ "e164": PHONE }))
                .to_request(),
        )
        .await,
    )
    .await;
    let session_id = body.session_metadata.unwrap().session_id;

    let body: CheckVerificationCodeResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/v1/registration/session/{}/code", session_id))
                .set_json(serde_json::json!({ "verification_code": "550100" }))
                .to_request(),
        )
        .await,
    )
    .await;

    assert!(!body.verified);

    let error = body.error.unwrap();
    assert_eq!(error.error_type, RegistrationErrorType::NoCodeSent);
    assert!(!error.may_retry);
    assert!(body.session_metadata.is_some());
}

#[actix_web::test]
async fn test_check_unknown_session_is_unverified() {
    let app = test::init_service(create_app(development_state())).await;

    let body: CheckVerificationCodeResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/v1/registration/session/{}/code", uuid::Uuid::new_v4()))
                .set_json(serde_json::json!({ "verification_code": "550100" }))
                .to_request(),
        )
        .await,
    )
    .await;

    assert!(!body.verified);
    assert!(body.error.is_none());
    assert!(body.session_metadata.is_none());
}

#[actix_web::test]
async fn test_empty_verification_code_is_invalid_argument() {
    let app = test::init_service(create_app(development_state())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/v1/registration/session/{}/code", uuid::Uuid::new_v4()))
            .set_json(serde_json::json!({ "verification_code": "" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_transport_is_invalid_argument() {
    let app = test::init_service(create_app(development_state())).await;

    let body: CreateSessionResponse = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/v1/registration/session")
                .set_json(serde_json::json!({ "e164": PHONE }))
                .to_request(),
        )
        .await,
    )
    .await;
    let session_id = body.session_metadata.unwrap().session_id;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/v1/registration/session/{}/code", session_id))
            .set_json(serde_json::json!({ "transport": "carrier-pigeon" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_session_id_fails_at_the_edge() {
    let app = test::init_service(create_app(development_state())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/v1/registration/session/not-a-uuid")
            .to_request(),
    )
    .await;

    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test::init_service(create_app(development_state())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
