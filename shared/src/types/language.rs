//! Language preference types
//!
//! Callers express language preferences as an `Accept-Language` style list
//! of weighted ranges. Sender adapters declare the language tags their
//! message templates or upstream locales support; the best match decides
//! whether an adapter can serve a request and which locale it uses.

use serde::{Deserialize, Serialize};

/// A single weighted language range from an `Accept-Language` value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRange {
    /// Language tag or prefix (e.g. `en`, `en-US`, or `*`)
    pub tag: String,

    /// Quality weight in `[0.0, 1.0]`; defaults to 1.0
    pub weight: f32,
}

impl LanguageRange {
    /// Create a range with the default weight
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            weight: 1.0,
        }
    }

    /// Parse an `Accept-Language` header value into ranges sorted by
    /// descending weight
    ///
    /// Malformed entries are skipped; an empty or unparseable header yields
    /// an empty list, which adapters treat as "no preference".
    pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
        let mut ranges: Vec<LanguageRange> = header
            .split(',')
            .filter_map(|entry| {
                let entry = entry.trim();
                if entry.is_empty() {
                    return None;
                }

                let (tag, weight) = match entry.split_once(';') {
                    Some((tag, params)) => {
                        let weight = params
                            .trim()
                            .strip_prefix("q=")
                            .and_then(|q| q.trim().parse::<f32>().ok())
                            .unwrap_or(1.0);
                        (tag.trim(), weight)
                    }
                    None => (entry, 1.0),
                };

                if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '*') {
                    return None;
                }

                Some(LanguageRange {
                    tag: tag.to_string(),
                    weight: weight.clamp(0.0, 1.0),
                })
            })
            .collect();

        ranges.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
        ranges
    }

    /// Whether this range matches the given language tag
    ///
    /// Matching follows RFC 4647 basic filtering: a range matches a tag if
    /// it equals the tag or is a prefix of it at a `-` boundary; `*` matches
    /// everything.
    pub fn matches(&self, tag: &str) -> bool {
        if self.tag == "*" {
            return true;
        }

        let range = self.tag.to_ascii_lowercase();
        let tag = tag.to_ascii_lowercase();

        tag == range || (tag.starts_with(&range) && tag.as_bytes().get(range.len()) == Some(&b'-'))
    }
}

/// Find the best supported language tag for the given preference ranges
///
/// Ranges are assumed sorted by descending weight (as produced by
/// [`LanguageRange::parse_accept_language`]); the first supported tag that
/// matches any range wins. Returns `None` when nothing matches.
pub fn lookup_tag<'a>(ranges: &[LanguageRange], supported: &'a [String]) -> Option<&'a str> {
    for range in ranges {
        if range.weight <= 0.0 {
            continue;
        }

        if let Some(tag) = supported.iter().find(|tag| range.matches(tag)) {
            return Some(tag.as_str());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accept_language() {
        let ranges = LanguageRange::parse_accept_language("en-US,en;q=0.9,zh;q=0.8");
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].tag, "en-US");
        assert_eq!(ranges[1].tag, "en");
        assert_eq!(ranges[2].tag, "zh");
    }

    #[test]
    fn test_parse_sorts_by_weight() {
        let ranges = LanguageRange::parse_accept_language("de;q=0.5,fr");
        assert_eq!(ranges[0].tag, "fr");
        assert_eq!(ranges[1].tag, "de");
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let ranges = LanguageRange::parse_accept_language("en, bad tag!, ,fr;q=0.3");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].tag, "en");
        assert_eq!(ranges[1].tag, "fr");
    }

    #[test]
    fn test_matches_prefix_at_boundary() {
        let range = LanguageRange::new("en");
        assert!(range.matches("en"));
        assert!(range.matches("en-US"));
        assert!(!range.matches("eng"));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let range = LanguageRange::new("*");
        assert!(range.matches("en"));
        assert!(range.matches("zh-Hans"));
    }

    #[test]
    fn test_lookup_tag() {
        let supported = vec!["en".to_string(), "zh".to_string()];

        let ranges = LanguageRange::parse_accept_language("zh-CN,zh;q=0.9,en;q=0.8");
        assert_eq!(lookup_tag(&ranges, &supported), Some("zh"));

        let ranges = LanguageRange::parse_accept_language("fr");
        assert_eq!(lookup_tag(&ranges, &supported), None);

        assert_eq!(lookup_tag(&[], &supported), None);
    }
}
