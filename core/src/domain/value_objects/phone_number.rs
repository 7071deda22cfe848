//! Parsed E.164 phone number value object
//!
//! The wire surface carries phone numbers as unsigned 64-bit integers
//! (country code plus subscriber digits, no leading `+`). Internally the
//! service only ever works with a validated, parsed number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use vg_shared::utils::phone::{is_valid_e164, mask_phone};

/// Error raised when a phone number cannot be parsed as E.164
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneNumberError {
    #[error("not a valid E.164 phone number")]
    InvalidNumber,
}

/// A validated E.164 phone number
///
/// Equality, hashing, and serialization are all defined over the canonical
/// E.164 rendering. `Debug` and `Display` mask the subscriber digits so the
/// raw number never leaks into logs by accident.
#[derive(Clone)]
pub struct PhoneNumber {
    e164: String,
    numeric: u64,
    country_code: u16,
}

impl PhoneNumber {
    /// Parse an E.164 string (with leading `+`) into a phone number
    pub fn parse(input: &str) -> Result<Self, PhoneNumberError> {
        if !is_valid_e164(input) {
            return Err(PhoneNumberError::InvalidNumber);
        }

        // The syntactic E.164 check above is the gate; the parser only
        // supplies the country-code split. No carrier-level validity check
        // (reserved test prefixes must parse).
        let parsed = input
            .parse::<phonenumber::PhoneNumber>()
            .map_err(|_| PhoneNumberError::InvalidNumber)?;

        let e164 = parsed.format().mode(phonenumber::Mode::E164).to_string();
        let numeric = e164[1..].parse::<u64>().map_err(|_| PhoneNumberError::InvalidNumber)?;

        Ok(Self {
            e164,
            numeric,
            country_code: parsed.code().value(),
        })
    }

    /// Parse the wire representation: country code and subscriber digits as
    /// a single integer, no leading `+`
    pub fn from_e164_u64(value: u64) -> Result<Self, PhoneNumberError> {
        if value == 0 {
            return Err(PhoneNumberError::InvalidNumber);
        }

        Self::parse(&format!("+{}", value))
    }

    /// Canonical E.164 rendering, including the leading `+`
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// Wire representation: all digits as a single integer
    pub fn to_e164_u64(&self) -> u64 {
        self.numeric
    }

    /// Country calling code (e.g. 1 for NANP, 44 for the UK)
    pub fn country_code(&self) -> u16 {
        self.country_code
    }

    /// The trailing `count` digits of the number, fewer if the number is
    /// shorter
    pub fn last_digits(&self, count: usize) -> String {
        let digits = &self.e164[1..];
        let start = digits.len().saturating_sub(count);
        digits[start..].to_string()
    }

    /// Masked rendering safe for logs
    pub fn masked(&self) -> String {
        mask_phone(&self.e164)
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl Hash for PhoneNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PhoneNumber").field(&self.masked()).finish()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.e164)
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        PhoneNumber::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_number() {
        let phone = PhoneNumber::parse("+15555550100").unwrap();
        assert_eq!(phone.e164(), "+15555550100");
        assert_eq!(phone.country_code(), 1);
        assert_eq!(phone.to_e164_u64(), 15555550100);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(PhoneNumber::parse("15555550100").is_err());
        assert!(PhoneNumber::parse("+").is_err());
        assert!(PhoneNumber::parse("not a number").is_err());
    }

    #[test]
    fn test_from_e164_u64() {
        let phone = PhoneNumber::from_e164_u64(15555550100).unwrap();
        assert_eq!(phone.e164(), "+15555550100");

        assert_eq!(PhoneNumber::from_e164_u64(0), Err(PhoneNumberError::InvalidNumber));
    }

    #[test]
    fn test_last_digits() {
        let phone = PhoneNumber::from_e164_u64(15555550100).unwrap();
        assert_eq!(phone.last_digits(6), "550100");
        assert_eq!(phone.last_digits(32), "15555550100");
    }

    #[test]
    fn test_debug_masks_number() {
        let phone = PhoneNumber::from_e164_u64(15555550100).unwrap();
        let rendered = format!("{:?}", phone);
        assert!(!rendered.contains("5555550100"));
        assert!(rendered.contains("0100"));
    }

    #[test]
    fn test_serde_round_trip() {
        let phone = PhoneNumber::from_e164_u64(15555550100).unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+15555550100\"");

        let back: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, phone);
    }
}
