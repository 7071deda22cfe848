//! Registration session entity
//!
//! One `RegistrationSession` tracks a single in-flight verification attempt
//! for one phone number: which sender handled it, the sender's opaque
//! payload, the code that eventually verified it, and an append-only log of
//! every send and check attempt. All mutation goes through the session
//! store's compare-and-swap update; the `version` counter is owned by the
//! store and bumped by exactly one on every successful write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::value_objects::phone_number::PhoneNumber;
use crate::domain::value_objects::transport::MessageTransport;

/// Outcome of a single send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SendAttemptOutcome {
    /// The sender accepted the request and the payload was stored
    Succeeded,
    /// The upstream provider rejected the request as malformed
    IllegalArgument,
    /// The upstream provider refused for policy or destination reasons
    Rejected,
    /// The upstream provider failed transiently
    Unavailable,
}

/// One entry in the session's send-attempt log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendAttempt {
    /// When the attempt completed
    pub timestamp: DateTime<Utc>,

    /// Transport the attempt used
    pub transport: MessageTransport,

    /// Name of the sender that handled the attempt
    pub sender_name: String,

    /// How the attempt ended
    pub outcome: SendAttemptOutcome,
}

/// Outcome of a single check attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckAttemptOutcome {
    /// The submitted code was accepted
    Matched,
    /// The submitted code was not accepted
    Mismatched,
}

/// One entry in the session's check-attempt log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAttempt {
    /// When the attempt completed
    pub timestamp: DateTime<Utc>,

    /// How the attempt ended
    pub outcome: CheckAttemptOutcome,
}

/// A server-side verification session for one phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSession {
    /// Opaque 128-bit identifier, assigned by the store at creation
    pub id: Uuid,

    /// The phone number being verified; immutable for the session's life
    pub phone_number: PhoneNumber,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// Absolute expiration time; extended (never shrunk) on successful sends
    pub expires_at: DateTime<Utc>,

    /// Name of the sender that most recently handled a send, if any
    ///
    /// Once set this never changes; later sends must route to the same
    /// sender.
    pub sender_name: Option<String>,

    /// Opaque payload produced by that sender and interpreted only by it
    pub sender_data: Option<Vec<u8>>,

    /// The code that verified this session, set exactly once
    pub verified_code: Option<String>,

    /// Append-only log of send attempts
    pub send_attempts: Vec<SendAttempt>,

    /// Append-only log of check attempts
    pub check_attempts: Vec<CheckAttempt>,

    /// Monotonic counter for compare-and-swap updates; owned by the store
    pub version: u64,
}

impl RegistrationSession {
    /// Create a fresh, unsent session record
    ///
    /// The id is nil until the store assigns one at creation.
    pub fn new(phone_number: PhoneNumber, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: Uuid::nil(),
            phone_number,
            created_at: now,
            expires_at: now + ttl_to_chrono(ttl),
            sender_name: None,
            sender_data: None,
            verified_code: None,
            send_attempts: Vec::new(),
            check_attempts: Vec::new(),
            version: 0,
        }
    }

    /// Whether the session has passed its absolute expiration time
    ///
    /// An expired session is treated as absent everywhere: reads return
    /// not-found and writes fail.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether a code has successfully verified this session
    pub fn is_verified(&self) -> bool {
        self.verified_code.is_some()
    }

    /// Extend the expiration time, never shrinking it
    pub fn extend_expiration(&mut self, now: DateTime<Utc>, ttl: Duration) {
        let candidate = now + ttl_to_chrono(ttl);
        if candidate > self.expires_at {
            self.expires_at = candidate;
        }
    }

    /// Append a send-attempt record
    pub fn record_send_attempt(
        &mut self,
        now: DateTime<Utc>,
        transport: MessageTransport,
        sender_name: &str,
        outcome: SendAttemptOutcome,
    ) {
        self.send_attempts.push(SendAttempt {
            timestamp: now,
            transport,
            sender_name: sender_name.to_string(),
            outcome,
        });
    }

    /// Append a check-attempt record
    pub fn record_check_attempt(&mut self, now: DateTime<Utc>, outcome: CheckAttemptOutcome) {
        self.check_attempts.push(CheckAttempt { timestamp: now, outcome });
    }
}

fn ttl_to_chrono(ttl: Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(i32::MAX as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_phone() -> PhoneNumber {
        PhoneNumber::from_e164_u64(15555550100).unwrap()
    }

    #[test]
    fn test_new_session_is_blank() {
        let now = Utc::now();
        let session = RegistrationSession::new(test_phone(), now, Duration::from_secs(600));

        assert!(session.id.is_nil());
        assert_eq!(session.created_at, now);
        assert_eq!(session.expires_at, now + chrono::Duration::seconds(600));
        assert!(session.sender_name.is_none());
        assert!(session.sender_data.is_none());
        assert!(!session.is_verified());
        assert!(session.send_attempts.is_empty());
        assert_eq!(session.version, 0);
    }

    #[test]
    fn test_expiration() {
        let now = Utc::now();
        let session = RegistrationSession::new(test_phone(), now, Duration::from_secs(60));

        assert!(!session.is_expired(now));
        assert!(!session.is_expired(now + chrono::Duration::seconds(60)));
        assert!(session.is_expired(now + chrono::Duration::seconds(61)));
    }

    #[test]
    fn test_extend_expiration_never_shrinks() {
        let now = Utc::now();
        let mut session = RegistrationSession::new(test_phone(), now, Duration::from_secs(600));
        let original = session.expires_at;

        session.extend_expiration(now, Duration::from_secs(60));
        assert_eq!(session.expires_at, original);

        session.extend_expiration(now, Duration::from_secs(1200));
        assert_eq!(session.expires_at, now + chrono::Duration::seconds(1200));
    }

    #[test]
    fn test_attempt_logs_are_append_only() {
        let now = Utc::now();
        let mut session = RegistrationSession::new(test_phone(), now, Duration::from_secs(600));

        session.record_send_attempt(now, MessageTransport::Sms, "last-digits", SendAttemptOutcome::Unavailable);
        session.record_send_attempt(now, MessageTransport::Sms, "last-digits", SendAttemptOutcome::Succeeded);
        session.record_check_attempt(now, CheckAttemptOutcome::Mismatched);

        assert_eq!(session.send_attempts.len(), 2);
        assert_eq!(session.send_attempts[0].outcome, SendAttemptOutcome::Unavailable);
        assert_eq!(session.send_attempts[1].outcome, SendAttemptOutcome::Succeeded);
        assert_eq!(session.check_attempts.len(), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let now = Utc::now();
        let mut session = RegistrationSession::new(test_phone(), now, Duration::from_secs(600));
        session.sender_name = Some("last-digits".to_string());
        session.sender_data = Some(b"550100".to_vec());

        let json = serde_json::to_string(&session).unwrap();
        let back: RegistrationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
