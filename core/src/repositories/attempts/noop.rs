//! No-op attempt analysis sink

use async_trait::async_trait;
use tracing::debug;

use super::sink::{AttemptAnalysisSink, AttemptSinkError, CompletedSendAttempt};

/// Sink that drops completion records, for deployments without an analysis
/// pipeline
#[derive(Debug, Default, Clone)]
pub struct NoOpAttemptAnalysisSink;

impl NoOpAttemptAnalysisSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AttemptAnalysisSink for NoOpAttemptAnalysisSink {
    async fn enqueue(&self, attempt: CompletedSendAttempt) -> Result<(), AttemptSinkError> {
        debug!(
            sender = %attempt.sender_name,
            transport = %attempt.transport,
            outcome = ?attempt.outcome,
            "Dropping completed attempt record (no analysis pipeline configured)"
        );
        Ok(())
    }
}
