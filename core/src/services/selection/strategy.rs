//! Choosing a sender for each send attempt

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use vg_shared::config::sender::SenderConfig;
use vg_shared::types::language::LanguageRange;

use crate::domain::value_objects::phone_number::PhoneNumber;
use crate::domain::value_objects::transport::{ClientType, MessageTransport};
use crate::errors::SenderError;
use crate::services::sender::registry::SenderRegistry;
use crate::services::sender::traits::VerificationCodeSender;

/// Picks one sender per send attempt
///
/// Implementations must be pure over a single call: the same inputs at the
/// same moment yield the same sender.
pub trait SenderSelectionStrategy: Send + Sync {
    /// Choose a sender for the request
    ///
    /// When a session has previously recorded a sender, that name is
    /// binding: the strategy returns that sender if it still supports the
    /// request and fails otherwise. Fails with
    /// [`SenderError::Unavailable`] when no sender can serve the request.
    fn choose_sender(
        &self,
        transport: MessageTransport,
        phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        client_type: ClientType,
        previously_selected: Option<&str>,
    ) -> Result<Arc<dyn VerificationCodeSender>, SenderError>;
}

/// Routing-table driven strategy
///
/// Resolution order for a fresh session: the route configured for the
/// destination's country calling code, then the configured default sender,
/// then the first supporting sender by name. Every step only considers
/// senders whose `supports(...)` is true for the request.
pub struct ConfiguredSelectionStrategy {
    registry: Arc<SenderRegistry>,
    sms_routes: HashMap<String, String>,
    voice_routes: HashMap<String, String>,
    default_sender: String,
}

impl ConfiguredSelectionStrategy {
    pub fn new(registry: Arc<SenderRegistry>, config: &SenderConfig) -> Self {
        Self {
            registry,
            sms_routes: config.sms_routes.clone(),
            voice_routes: config.voice_routes.clone(),
            default_sender: config.default_sender.clone(),
        }
    }

    fn routes(&self, transport: MessageTransport) -> &HashMap<String, String> {
        match transport {
            MessageTransport::Sms => &self.sms_routes,
            MessageTransport::Voice => &self.voice_routes,
        }
    }
}

impl SenderSelectionStrategy for ConfiguredSelectionStrategy {
    fn choose_sender(
        &self,
        transport: MessageTransport,
        phone_number: &PhoneNumber,
        language_ranges: &[LanguageRange],
        client_type: ClientType,
        previously_selected: Option<&str>,
    ) -> Result<Arc<dyn VerificationCodeSender>, SenderError> {
        let supports = |sender: &Arc<dyn VerificationCodeSender>| {
            sender.supports(transport, phone_number, language_ranges, client_type)
        };

        // A sender already recorded on the session is binding
        if let Some(name) = previously_selected {
            let sender = self
                .registry
                .get(name)
                .ok_or_else(|| SenderError::Unavailable(format!("previously selected sender {} is not registered", name)))?;

            if !supports(&sender) {
                warn!(sender = name, "Previously selected sender no longer supports this request");
                return Err(SenderError::Unavailable(format!(
                    "previously selected sender {} no longer supports this request",
                    name
                )));
            }

            return Ok(sender);
        }

        let country_code = phone_number.country_code().to_string();

        if let Some(sender) = self
            .routes(transport)
            .get(&country_code)
            .and_then(|name| self.registry.get(name))
            .filter(supports)
        {
            debug!(sender = sender.name(), country_code = %country_code, "Selected routed sender");
            return Ok(sender);
        }

        if let Some(sender) = self.registry.get(&self.default_sender).filter(supports) {
            debug!(sender = sender.name(), "Selected default sender");
            return Ok(sender);
        }

        // Deterministic last resort: first supporting sender by name
        for name in self.registry.names() {
            if let Some(sender) = self.registry.get(name).filter(supports) {
                debug!(sender = name, "Selected fallback sender");
                return Ok(sender);
            }
        }

        Err(SenderError::Unavailable("no sender supports this request".to_string()))
    }
}
