//! Verification orchestrator implementation

use chrono::Utc;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vg_shared::types::language::LanguageRange;

use crate::domain::entities::session::{CheckAttemptOutcome, RegistrationSession, SendAttemptOutcome};
use crate::domain::value_objects::phone_number::PhoneNumber;
use crate::domain::value_objects::transport::{ClientType, MessageTransport};
use crate::errors::{
    CheckCodeError, CreateSessionError, RateLimitError, SendCodeError, SenderError, StoreError,
};
use crate::repositories::attempts::{
    AttemptAnalysisSink, CompletedSendAttempt, NoOpAttemptAnalysisSink,
};
use crate::repositories::session::{SessionMutator, SessionStore};
use crate::services::ratelimit::RateLimiters;
use crate::services::selection::SenderSelectionStrategy;
use crate::services::sender::SenderRegistry;

use super::config::RegistrationServiceConfig;

/// Result of a `check_code` call
///
/// `session` is absent only when no live session existed for the given id;
/// the external contract deliberately does not distinguish that case from
/// an unverified session.
#[derive(Debug, Clone)]
pub struct CheckCodeOutcome {
    /// Whether the submitted code verified the session
    pub verified: bool,

    /// The session after the check, when one existed
    pub session: Option<RegistrationSession>,
}

/// The verification orchestrator
///
/// Drives the session state machine: rate limiters are consulted before
/// every state-changing operation (number-scoped before session-scoped,
/// first denial wins), all session mutation goes through the store's
/// compare-and-swap with a bounded jittered retry, and sender failures are
/// translated into the public error taxonomy.
pub struct RegistrationService<S, A = NoOpAttemptAnalysisSink>
where
    S: SessionStore,
    A: AttemptAnalysisSink,
{
    /// Session store; owner of all session state
    session_store: Arc<S>,
    /// Name → sender map populated at start-up
    sender_registry: Arc<SenderRegistry>,
    /// Strategy choosing one sender per attempt
    selection_strategy: Arc<dyn SenderSelectionStrategy>,
    /// The named rate limiters
    rate_limiters: RateLimiters,
    /// Queue for completed send attempts
    attempt_sink: Arc<A>,
    /// Service configuration
    config: RegistrationServiceConfig,
}

impl<S: SessionStore> RegistrationService<S> {
    /// Create an orchestrator without an attempt-analysis pipeline
    pub fn new(
        session_store: Arc<S>,
        sender_registry: Arc<SenderRegistry>,
        selection_strategy: Arc<dyn SenderSelectionStrategy>,
        rate_limiters: RateLimiters,
        config: RegistrationServiceConfig,
    ) -> Self {
        Self {
            session_store,
            sender_registry,
            selection_strategy,
            rate_limiters,
            attempt_sink: Arc::new(NoOpAttemptAnalysisSink),
            config,
        }
    }
}

impl<S, A> RegistrationService<S, A>
where
    S: SessionStore,
    A: AttemptAnalysisSink,
{
    /// Create an orchestrator that enqueues completed attempts to the given
    /// sink
    pub fn with_attempt_sink(
        session_store: Arc<S>,
        sender_registry: Arc<SenderRegistry>,
        selection_strategy: Arc<dyn SenderSelectionStrategy>,
        rate_limiters: RateLimiters,
        attempt_sink: Arc<A>,
        config: RegistrationServiceConfig,
    ) -> Self {
        Self {
            session_store,
            sender_registry,
            selection_strategy,
            rate_limiters,
            attempt_sink,
            config,
        }
    }

    /// Create a verification session for the given wire-format phone number
    pub async fn create_session(&self, e164: u64, source: &str) -> Result<RegistrationSession, CreateSessionError> {
        let phone_number =
            PhoneNumber::from_e164_u64(e164).map_err(|_| CreateSessionError::IllegalPhoneNumber)?;

        self.rate_limiters
            .session_creation
            .check_rate_limit(&(phone_number.clone(), source.to_string()))
            .await
            .map_err(|err| match err {
                RateLimitError::Exceeded { retry_after } => CreateSessionError::RateLimited { retry_after },
                RateLimitError::Unavailable(message) => CreateSessionError::Internal(message),
            })?;

        let now = Utc::now();
        let record = RegistrationSession::new(phone_number.clone(), now, self.config.default_session_ttl);

        let session = self
            .session_store
            .create(record, self.config.default_session_ttl)
            .await
            .map_err(|err| CreateSessionError::Internal(err.to_string()))?;

        info!(session_id = %session.id, phone = %phone_number, "Created registration session");

        Ok(session)
    }

    /// Send (or re-send) a verification code for an existing session
    pub async fn send_code(
        &self,
        session_id: Uuid,
        transport: MessageTransport,
        language_ranges: &[LanguageRange],
        client_type: ClientType,
    ) -> Result<RegistrationSession, SendCodeError> {
        let session = match self.session_store.get(&session_id).await {
            Ok(session) => session,
            Err(StoreError::NotFound) => return Err(SendCodeError::NoSession),
            Err(err) => return Err(SendCodeError::Transient(err.to_string())),
        };

        if session.is_verified() {
            return Err(SendCodeError::AlreadyVerified(Box::new(session)));
        }

        let phone_number = session.phone_number.clone();

        map_send_rate_limit(
            self.rate_limiters
                .send_per_number(transport)
                .check_rate_limit(&phone_number)
                .await,
        )?;
        map_send_rate_limit(
            self.rate_limiters
                .send_per_session(transport)
                .check_rate_limit(&session_id)
                .await,
        )?;

        let sender = self
            .selection_strategy
            .choose_sender(
                transport,
                &phone_number,
                language_ranges,
                client_type,
                session.sender_name.as_deref(),
            )
            .map_err(|err| SendCodeError::SenderUnavailable(err.to_string()))?;

        let sender_name = sender.name().to_string();

        debug!(
            session_id = %session_id,
            sender = %sender_name,
            %transport,
            "Dispatching verification code"
        );

        let send_result = self
            .with_upstream_timeout(sender.send_verification_code(
                transport,
                &phone_number,
                language_ranges,
                client_type,
            ))
            .await;

        let now = Utc::now();

        match send_result {
            Ok(payload) => {
                let session_ttl = sender.session_ttl();
                let name = sender_name.clone();

                let updated = self
                    .update_with_retry(&session_id, &move |mut session: RegistrationSession| {
                        if session.sender_name.is_none() {
                            session.sender_name = Some(name.clone());
                        }
                        session.sender_data = Some(payload.clone());
                        session.extend_expiration(now, session_ttl);
                        session.record_send_attempt(now, transport, &name, SendAttemptOutcome::Succeeded);
                        session
                    })
                    .await
                    .map_err(|err| match err {
                        StoreError::NotFound => SendCodeError::NoSession,
                        other => SendCodeError::Transient(other.to_string()),
                    })?;

                self.enqueue_attempt(session_id, &sender_name, transport, SendAttemptOutcome::Succeeded, now)
                    .await;

                info!(
                    session_id = %session_id,
                    sender = %sender_name,
                    %transport,
                    "Verification code sent"
                );

                Ok(updated)
            }
            Err(err) => {
                let outcome = match &err {
                    SenderError::IllegalArgument(_) => SendAttemptOutcome::IllegalArgument,
                    SenderError::Rejected(_) => SendAttemptOutcome::Rejected,
                    _ => SendAttemptOutcome::Unavailable,
                };

                // The failed attempt still lands in the session's log;
                // sender name and payload stay untouched.
                let name = sender_name.clone();
                if let Err(log_err) = self
                    .update_with_retry(&session_id, &move |mut session: RegistrationSession| {
                        session.record_send_attempt(now, transport, &name, outcome);
                        session
                    })
                    .await
                {
                    warn!(
                        session_id = %session_id,
                        error = %log_err,
                        "Failed to record unsuccessful send attempt"
                    );
                }

                self.enqueue_attempt(session_id, &sender_name, transport, outcome, now).await;

                warn!(
                    session_id = %session_id,
                    sender = %sender_name,
                    error = %err,
                    "Verification code send failed"
                );

                Err(map_sender_error(err))
            }
        }
    }

    /// Check a submitted verification code
    pub async fn check_code(&self, session_id: Uuid, verification_code: &str) -> Result<CheckCodeOutcome, CheckCodeError> {
        let session = match self.session_store.get(&session_id).await {
            Ok(session) => session,
            // The external contract does not distinguish a missing session
            // from an unverified one here.
            Err(StoreError::NotFound) => {
                return Ok(CheckCodeOutcome {
                    verified: false,
                    session: None,
                })
            }
            Err(err) => return Err(CheckCodeError::Internal(err.to_string())),
        };

        // Idempotent re-check of the code that already verified the
        // session; no limiter consultation, no upstream call.
        if session.verified_code.as_deref() == Some(verification_code) {
            return Ok(CheckCodeOutcome {
                verified: true,
                session: Some(session),
            });
        }

        let Some(sender_data) = session.sender_data.clone() else {
            return Err(CheckCodeError::NoCodeSent(Box::new(session)));
        };

        let phone_number = session.phone_number.clone();

        map_check_rate_limit(self.rate_limiters.check_per_number.check_rate_limit(&phone_number).await)?;
        map_check_rate_limit(self.rate_limiters.check_per_session.check_rate_limit(&session_id).await)?;

        let Some(sender_name) = session.sender_name.clone() else {
            return Err(CheckCodeError::Internal(
                "session has a payload but no sender recorded".to_string(),
            ));
        };

        let sender = self.sender_registry.get(&sender_name).ok_or_else(|| {
            CheckCodeError::Internal(format!("sender {} is not registered", sender_name))
        })?;

        let valid = self
            .with_upstream_timeout(sender.check_verification_code(verification_code, &sender_data))
            .await
            .map_err(|err| match err {
                SenderError::IllegalArgument(message) => CheckCodeError::IllegalArgument(message),
                other => CheckCodeError::Internal(other.to_string()),
            })?;

        let now = Utc::now();
        let outcome = if valid {
            CheckAttemptOutcome::Matched
        } else {
            CheckAttemptOutcome::Mismatched
        };
        let code = verification_code.to_string();

        let updated = self
            .update_with_retry(&session_id, &move |mut session: RegistrationSession| {
                session.record_check_attempt(now, outcome);
                if valid && session.verified_code.is_none() {
                    session.verified_code = Some(code.clone());
                }
                session
            })
            .await
            .map_err(|err| CheckCodeError::Internal(err.to_string()))?;

        if valid {
            info!(session_id = %session_id, sender = %sender_name, "Session verified");
        } else {
            debug!(session_id = %session_id, "Verification code did not match");
        }

        Ok(CheckCodeOutcome {
            verified: valid,
            session: Some(updated),
        })
    }

    /// Fetch a session without mutating anything
    pub async fn get_session(&self, session_id: Uuid) -> Result<RegistrationSession, StoreError> {
        self.session_store.get(&session_id).await
    }

    /// Apply a mutation under compare-and-swap, retrying conflicts a
    /// bounded number of times with jittered back-off
    async fn update_with_retry(
        &self,
        session_id: &Uuid,
        mutator: SessionMutator<'_>,
    ) -> Result<RegistrationSession, StoreError> {
        let attempts = self.config.update_retry_attempts.max(1);

        for attempt in 1..=attempts {
            match self.session_store.update(session_id, mutator).await {
                Err(StoreError::Conflict) if attempt < attempts => {
                    let backoff = self.config.update_retry_base_delay * 2u32.saturating_pow(attempt - 1);
                    let jitter_ms = self.config.update_retry_jitter.as_millis() as u64;
                    let jitter = if jitter_ms == 0 {
                        Duration::ZERO
                    } else {
                        let drawn = rand::thread_rng().gen_range(0..=jitter_ms);
                        Duration::from_millis(drawn)
                    };

                    debug!(
                        session_id = %session_id,
                        attempt,
                        "Session update conflicted, retrying"
                    );

                    tokio::time::sleep(backoff + jitter).await;
                }
                other => return other,
            }
        }

        Err(StoreError::Conflict)
    }

    /// Cap an upstream sender call with the configured per-call timeout
    async fn with_upstream_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, SenderError>>,
    ) -> Result<T, SenderError> {
        match tokio::time::timeout(self.config.upstream_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SenderError::Unavailable("upstream call timed out".to_string())),
        }
    }

    /// Best-effort enqueue of a completion record
    async fn enqueue_attempt(
        &self,
        session_id: Uuid,
        sender_name: &str,
        transport: MessageTransport,
        outcome: SendAttemptOutcome,
        timestamp: chrono::DateTime<Utc>,
    ) {
        let record = CompletedSendAttempt {
            session_id,
            sender_name: sender_name.to_string(),
            transport,
            outcome,
            timestamp,
        };

        if let Err(err) = self.attempt_sink.enqueue(record).await {
            warn!(session_id = %session_id, error = %err, "Failed to enqueue attempt record");
        }
    }
}

fn map_send_rate_limit(result: Result<(), RateLimitError>) -> Result<(), SendCodeError> {
    result.map_err(|err| match err {
        RateLimitError::Exceeded { retry_after } => SendCodeError::RateLimited { retry_after },
        RateLimitError::Unavailable(message) => SendCodeError::Transient(message),
    })
}

fn map_check_rate_limit(result: Result<(), RateLimitError>) -> Result<(), CheckCodeError> {
    result.map_err(|err| match err {
        RateLimitError::Exceeded { retry_after } => CheckCodeError::RateLimited { retry_after },
        RateLimitError::Unavailable(message) => CheckCodeError::Internal(message),
    })
}

fn map_sender_error(err: SenderError) -> SendCodeError {
    match err {
        SenderError::IllegalArgument(message) => SendCodeError::SenderIllegalArgument(message),
        SenderError::Rejected(message) => SendCodeError::SenderRejected(message),
        SenderError::UnsupportedTransport => {
            SendCodeError::SenderUnavailable("selected sender does not handle this transport".to_string())
        }
        SenderError::Unavailable(message) => SendCodeError::SenderUnavailable(message),
        SenderError::InvalidSessionData(message) => SendCodeError::SenderUnavailable(message),
    }
}
