//! Provider sender adapters
//!
//! Each adapter implements the core sender contract against one upstream
//! provider. Provided-code adapters (Twilio Programmable Messaging,
//! MessageBird) generate the code locally and store it as the session
//! payload; the delegated adapter (Twilio Verify) stores the upstream
//! verification handle instead.

pub mod messagebird;
pub mod provided_code;
pub mod twilio_messaging;
pub mod twilio_verify;

pub use messagebird::MessageBirdSmsSender;
pub use twilio_messaging::TwilioMessagingServiceSmsSender;
pub use twilio_verify::TwilioVerifySender;

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use vg_shared::config::sender::SenderConfig;

use vg_core::services::sender::{
    LastDigitsVerificationCodeSender, VerificationCodeSender, VerificationSmsBodyProvider,
};

use crate::InfrastructureError;

/// Build the sender set for the given configuration
///
/// Providers with credentials configured are registered; when none are, the
/// synthetic last-digits sender is wired instead so the service still comes
/// up in a usable (development) shape.
pub fn create_senders(config: &SenderConfig) -> Result<Vec<Arc<dyn VerificationCodeSender>>, InfrastructureError> {
    let mut senders: Vec<Arc<dyn VerificationCodeSender>> = Vec::new();
    let body_provider = VerificationSmsBodyProvider::with_default_templates();
    let request_timeout = Duration::from_secs(config.request_timeout_seconds);

    if let Some(twilio) = &config.twilio {
        senders.push(Arc::new(TwilioMessagingServiceSmsSender::new(
            twilio.clone(),
            body_provider.clone(),
        )));
        senders.push(Arc::new(TwilioVerifySender::new(
            twilio.clone(),
            config.supported_languages.clone(),
            request_timeout,
        )?));
        info!("Registered Twilio senders");
    }

    if let Some(messagebird) = &config.messagebird {
        senders.push(Arc::new(MessageBirdSmsSender::new(
            messagebird.clone(),
            body_provider.clone(),
            request_timeout,
        )?));
        info!("Registered MessageBird sender");
    }

    if senders.is_empty() {
        warn!("No provider senders configured, falling back to the last-digits development sender");
        senders.push(Arc::new(LastDigitsVerificationCodeSender::new()));
    }

    Ok(senders)
}
