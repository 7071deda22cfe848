//! Localized message bodies for provided-code senders

use std::collections::HashMap;

use vg_shared::types::language::{lookup_tag, LanguageRange};

/// Placeholder replaced by the verification code in message templates
const CODE_PLACEHOLDER: &str = "{code}";

/// Provides the SMS body carrying a locally generated verification code
///
/// Templates are keyed by language tag; the caller's language ranges pick
/// the best match, falling back to the first configured template.
#[derive(Debug, Clone)]
pub struct VerificationSmsBodyProvider {
    languages: Vec<String>,
    templates: HashMap<String, String>,
}

impl VerificationSmsBodyProvider {
    /// Create a provider from (language tag, template) pairs
    ///
    /// The order of the pairs decides the fallback: the first entry is used
    /// when no range matches.
    pub fn new(templates: Vec<(String, String)>) -> Self {
        let languages = templates.iter().map(|(tag, _)| tag.clone()).collect();
        Self {
            languages,
            templates: templates.into_iter().collect(),
        }
    }

    /// Provider with the built-in templates
    pub fn with_default_templates() -> Self {
        Self::new(vec![
            ("en".to_string(), "Your verification code is {code}".to_string()),
            ("es".to_string(), "Tu código de verificación es {code}".to_string()),
            ("fr".to_string(), "Votre code de vérification est {code}".to_string()),
            ("de".to_string(), "Dein Bestätigungscode lautet {code}".to_string()),
            ("zh".to_string(), "您的验证码是 {code}".to_string()),
        ])
    }

    /// Language tags this provider has templates for
    pub fn supported_languages(&self) -> &[String] {
        &self.languages
    }

    /// Whether any of the given ranges matches a template language
    ///
    /// An empty range list means "no preference" and is always satisfied.
    pub fn supports_language(&self, language_ranges: &[LanguageRange]) -> bool {
        language_ranges.is_empty() || lookup_tag(language_ranges, &self.languages).is_some()
    }

    /// Render the message body for the given code and language preferences
    pub fn verification_body(&self, verification_code: &str, language_ranges: &[LanguageRange]) -> String {
        let tag = lookup_tag(language_ranges, &self.languages)
            .or_else(|| self.languages.first().map(String::as_str))
            .unwrap_or("en");

        self.templates
            .get(tag)
            .map(|template| template.replace(CODE_PLACEHOLDER, verification_code))
            .unwrap_or_else(|| format!("Your verification code is {}", verification_code))
    }
}

impl Default for VerificationSmsBodyProvider {
    fn default() -> Self {
        Self::with_default_templates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_uses_matching_language() {
        let provider = VerificationSmsBodyProvider::with_default_templates();
        let ranges = LanguageRange::parse_accept_language("fr-FR,fr;q=0.9,en;q=0.5");

        let body = provider.verification_body("123456", &ranges);
        assert_eq!(body, "Votre code de vérification est 123456");
    }

    #[test]
    fn test_body_falls_back_to_first_template() {
        let provider = VerificationSmsBodyProvider::with_default_templates();
        let ranges = LanguageRange::parse_accept_language("ja");

        let body = provider.verification_body("123456", &ranges);
        assert_eq!(body, "Your verification code is 123456");
    }

    #[test]
    fn test_supports_language() {
        let provider = VerificationSmsBodyProvider::with_default_templates();

        assert!(provider.supports_language(&[]));
        assert!(provider.supports_language(&LanguageRange::parse_accept_language("zh-CN,zh")));
        assert!(!provider.supports_language(&LanguageRange::parse_accept_language("ja")));
    }
}
