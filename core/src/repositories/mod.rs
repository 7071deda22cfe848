//! Repository contracts and in-process implementations

pub mod attempts;
pub mod session;

pub use attempts::{AttemptAnalysisSink, CompletedSendAttempt};
pub use session::SessionStore;
