//! In-memory attempt analysis sink

use async_trait::async_trait;
use std::sync::Mutex;

use super::sink::{AttemptAnalysisSink, AttemptSinkError, CompletedSendAttempt};

/// Sink that buffers completion records in memory
///
/// Used by tests and by development deployments that want to inspect what
/// the orchestrator enqueued.
#[derive(Debug, Default)]
pub struct InMemoryAttemptAnalysisSink {
    attempts: Mutex<Vec<CompletedSendAttempt>>,
}

impl InMemoryAttemptAnalysisSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything enqueued so far
    pub fn attempts(&self) -> Vec<CompletedSendAttempt> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Remove and return everything enqueued so far
    pub fn drain(&self) -> Vec<CompletedSendAttempt> {
        self.attempts.lock().map(|mut a| std::mem::take(&mut *a)).unwrap_or_default()
    }
}

#[async_trait]
impl AttemptAnalysisSink for InMemoryAttemptAnalysisSink {
    async fn enqueue(&self, attempt: CompletedSendAttempt) -> Result<(), AttemptSinkError> {
        self.attempts
            .lock()
            .map_err(|_| AttemptSinkError::Unavailable("attempt buffer poisoned".to_string()))?
            .push(attempt);
        Ok(())
    }
}
