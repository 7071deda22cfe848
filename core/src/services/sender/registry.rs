//! Sender registry

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::traits::VerificationCodeSender;

/// Error raised when two registered senders share a name
#[derive(Debug, Error)]
#[error("duplicate sender name: {0}")]
pub struct DuplicateSenderError(pub String);

/// Immutable name → sender map, populated at start-up
///
/// Sessions persist the name of the sender that handled them; the registry
/// is the only way a name is ever resolved back to a sender, and it never
/// changes after construction.
pub struct SenderRegistry {
    senders: HashMap<String, Arc<dyn VerificationCodeSender>>,
}

impl SenderRegistry {
    /// Build a registry from the configured senders
    pub fn new(senders: Vec<Arc<dyn VerificationCodeSender>>) -> Result<Self, DuplicateSenderError> {
        let mut by_name = HashMap::with_capacity(senders.len());

        for sender in senders {
            let name = sender.name().to_string();
            if by_name.insert(name.clone(), sender).is_some() {
                return Err(DuplicateSenderError(name));
            }
        }

        Ok(Self { senders: by_name })
    }

    /// Resolve a sender by its stable name
    pub fn get(&self, name: &str) -> Option<Arc<dyn VerificationCodeSender>> {
        self.senders.get(name).cloned()
    }

    /// All registered senders, in unspecified order
    pub fn senders(&self) -> impl Iterator<Item = &Arc<dyn VerificationCodeSender>> {
        self.senders.values()
    }

    /// Registered sender names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.senders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sender::last_digits::LastDigitsVerificationCodeSender;

    #[test]
    fn test_registry_lookup() {
        let registry =
            SenderRegistry::new(vec![Arc::new(LastDigitsVerificationCodeSender::new())]).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("last-digits").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.names(), vec!["last-digits"]);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = SenderRegistry::new(vec![
            Arc::new(LastDigitsVerificationCodeSender::new()),
            Arc::new(LastDigitsVerificationCodeSender::new()),
        ]);

        assert!(result.is_err());
    }
}
