//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// E.164: up to 15 digits, no leading zero on the country code
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").unwrap()
});

/// Check if a string is a well-formed E.164 phone number
pub fn is_valid_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Mask a phone number for logging (show only the last 4 digits)
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        return "*".repeat(phone.len());
    }
    format!("***{}", &phone[phone.len() - 4..])
}
