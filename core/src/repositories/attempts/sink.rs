//! Attempt analysis sink contract

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::session::SendAttemptOutcome;
use crate::domain::value_objects::transport::MessageTransport;

/// A completed send attempt, ready for downstream analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSendAttempt {
    /// Session the attempt belongs to
    pub session_id: Uuid,

    /// Name of the sender that handled the attempt
    pub sender_name: String,

    /// Transport the attempt used
    pub transport: MessageTransport,

    /// How the attempt ended
    pub outcome: SendAttemptOutcome,

    /// When the attempt completed
    pub timestamp: DateTime<Utc>,
}

/// Failure to enqueue a completion record
#[derive(Debug, Error)]
pub enum AttemptSinkError {
    #[error("attempt sink unavailable: {0}")]
    Unavailable(String),
}

/// Queue of completed send attempts for later analysis
///
/// Enqueueing is best effort from the orchestrator's point of view: a sink
/// failure is logged but never fails the verification operation itself.
#[async_trait]
pub trait AttemptAnalysisSink: Send + Sync {
    /// Enqueue one completion record
    async fn enqueue(&self, attempt: CompletedSendAttempt) -> Result<(), AttemptSinkError>;
}
