//! Address validation and pattern matching
//!
//! OSC addresses look like paths:
//! ```text
//! /mixer/channel/3/fader
//! ```
//!
//! Patterns may additionally contain:
//! - `?` one character, `*` any run of characters
//! - `[abc]` / `[!abc]` one of (or none of) the listed characters
//! - `[a-z]` / `[!a-z]` a character range
//! - `{foo,bar}` one of the listed words
//! - a leading `//` to match the rest of the pattern at any depth

mod cache;
mod part;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use regex_lite::Regex;
use tracing::debug;

pub use cache::MatcherCache;
pub use part::{AddressPart, AddressPartKind};

use crate::{Error, Result};

/// A validated address or address pattern
///
/// Equality and hashing use the original text only, so two differently
/// spelled patterns that match the same addresses are not equal.
#[derive(Debug, Clone)]
pub struct OscAddress {
    original: String,
    parts: Vec<AddressPart>,
    matcher: Option<Arc<Regex>>,
}

impl OscAddress {
    /// Parse an address, compiling patterns through [`MatcherCache::global`]
    pub fn new(address: &str) -> Result<Self> {
        Self::with_cache(address, MatcherCache::global())
    }

    pub fn try_new(address: &str) -> Option<Self> {
        Self::new(address).ok()
    }

    /// Parse an address, compiling patterns through `cache`
    pub fn with_cache(address: &str, cache: &MatcherCache) -> Result<Self> {
        if !is_valid_pattern(address) {
            return Err(Error::InvalidAddress(format!(
                "the address \"{}\" is not a valid osc address",
                address
            )));
        }

        let mut parts = Vec::new();
        let mut rest = address;
        let mut skip_separator = false;

        if let Some(stripped) = address.strip_prefix("//") {
            parts.push(AddressPart::address_wildcard());
            rest = stripped;
            skip_separator = true;
        }

        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            if skip_separator {
                skip_separator = false;
            } else {
                parts.push(AddressPart::separator());
            }

            let scanned = part::scan_segment(segment).ok_or_else(|| {
                Error::InvalidAddress(format!("unknown address part \"{}\"", segment))
            })?;
            parts.extend(scanned);
        }

        if parts.iter().all(AddressPart::is_literal) {
            return Ok(Self {
                original: address.to_string(),
                parts,
                matcher: None,
            });
        }

        let anchor = match parts.first().map(AddressPart::kind) {
            Some(AddressPartKind::AddressWildcard) => "(",
            _ => "^(",
        };

        let mut expression = String::from(anchor);
        for part in &parts {
            expression.push_str(part.fragment());
        }
        expression.push_str(")$");

        debug!(address, %expression, "compiled address pattern");
        let matcher = cache.acquire(&expression)?;

        Ok(Self {
            original: address.to_string(),
            parts,
            matcher: Some(matcher),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// True when the address contains no pattern syntax
    pub fn is_literal(&self) -> bool {
        self.matcher.is_none()
    }

    pub fn parts(&self) -> &[AddressPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The regular expression a pattern compiled to
    pub fn expression(&self) -> Option<&str> {
        self.matcher.as_deref().map(Regex::as_str)
    }

    /// Concatenation of every part's canonical text
    pub fn interpreted(&self) -> String {
        self.parts.iter().map(AddressPart::interpreted).collect()
    }

    /// Match a concrete address; literals compare by text. `address` must
    /// itself be a valid literal address.
    pub fn matches(&self, address: &str) -> bool {
        match &self.matcher {
            None => self.original == address,
            Some(matcher) => is_valid_literal(address) && matcher.is_match(address),
        }
    }

    /// Match against another address. If exactly one side is a pattern it
    /// is applied to the other; two patterns compare by text.
    pub fn matches_address(&self, other: &OscAddress) -> bool {
        match (&self.matcher, &other.matcher) {
            (None, None) => self.original == other.original,
            (None, Some(matcher)) => matcher.is_match(&self.original),
            (Some(matcher), None) => matcher.is_match(&other.original),
            (Some(_), Some(_)) => self.original == other.original,
        }
    }
}

impl PartialEq for OscAddress {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

impl Eq for OscAddress {}

impl Hash for OscAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.original.hash(state);
    }
}

impl fmt::Display for OscAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl std::str::FromStr for OscAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for OscAddress {
    fn as_ref(&self) -> &str {
        &self.original
    }
}

// ============ Validation ============

/// A concrete address: `/` separated, non-empty segments with no pattern
/// characters or whitespace
pub fn is_valid_literal(address: &str) -> bool {
    if address.trim().is_empty() {
        return false;
    }

    match address.strip_prefix('/') {
        Some(rest) => rest
            .split('/')
            .all(|segment| !segment.is_empty() && segment.chars().all(part::is_literal_char)),
        None => false,
    }
}

/// A literal, or a pattern whose every segment parses into pattern parts
pub fn is_valid_pattern(address: &str) -> bool {
    if address.trim().is_empty() {
        return false;
    }

    let rest = match address.strip_prefix("//") {
        Some(rest) => rest,
        None => match address.strip_prefix('/') {
            Some(rest) => rest,
            None => return false,
        },
    };

    let coarse = rest.split('/').all(|segment| {
        !segment.is_empty() && segment.chars().all(|c| !c.is_whitespace() && c != '#')
    });
    if !coarse {
        return false;
    }

    if is_valid_literal(address) {
        return true;
    }

    address
        .split('/')
        .filter(|segment| !segment.is_empty())
        .all(|segment| part::scan_segment(segment).is_some())
}

/// Whether `pattern` matches the literal `address`, using the global cache
pub fn is_match(pattern: &str, address: &str) -> bool {
    is_match_with(pattern, address, MatcherCache::global())
}

pub fn is_match_with(pattern: &str, address: &str, cache: &MatcherCache) -> bool {
    if !is_valid_literal(address) {
        return false;
    }

    if is_valid_literal(pattern) {
        return pattern == address;
    }

    if !is_valid_pattern(pattern) {
        return false;
    }

    match OscAddress::with_cache(pattern, cache) {
        Ok(compiled) => compiled.matches(address),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_validation() {
        assert!(is_valid_literal("/a"));
        assert!(is_valid_literal("/a/b_c/1"));
        assert!(!is_valid_literal("/"));
        assert!(!is_valid_literal("/a/"));
        assert!(!is_valid_literal("a/b"));
        assert!(!is_valid_literal("/a*"));
        assert!(!is_valid_literal("   "));
    }

    #[test]
    fn test_pattern_validation() {
        assert!(is_valid_pattern("/a/*"));
        assert!(is_valid_pattern("//b"));
        assert!(!is_valid_pattern("///b"));
        assert!(!is_valid_pattern("/a#b"));
        assert!(!is_valid_pattern("/a/[b"));
    }

    #[test]
    fn test_literal_has_no_matcher() {
        let address = OscAddress::new("/a/b").unwrap();
        assert!(address.is_literal());
        assert!(address.expression().is_none());
        assert!(address.matches("/a/b"));
        assert!(!address.matches("/a/c"));
    }

    #[test]
    fn test_pattern_rejects_invalid_address() {
        let address = OscAddress::new("/*").unwrap();
        assert!(address.matches("/ab"));
        assert!(!address.matches("/a\u{A0}b"));
        assert!(!address.matches("/a b"));
        assert_eq!(address.matches("/a\u{A0}b"), is_match("/*", "/a\u{A0}b"));
    }

    #[test]
    fn test_address_wildcard_unanchored() {
        let cache = MatcherCache::new();
        let address = OscAddress::with_cache("//b", &cache).unwrap();
        assert_eq!(address.expression(), Some("(/(b))$"));
        assert!(address.matches("/a/b"));
        assert!(address.matches("/b"));
        assert!(!address.matches("/b/a"));
    }

    #[test]
    fn test_matches_address() {
        let literal = OscAddress::new("/mixer/3").unwrap();
        let pattern = OscAddress::new("/mixer/[0-9]").unwrap();
        let other = OscAddress::new("/mixer/*").unwrap();

        assert!(literal.matches_address(&pattern));
        assert!(pattern.matches_address(&literal));
        assert!(!pattern.matches_address(&other));
        assert!(pattern.matches_address(&pattern.clone()));
    }

    #[test]
    fn test_text_equality() {
        let a = OscAddress::new("/a/{x,y}").unwrap();
        let b = OscAddress::new("/a/{y,x}").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, OscAddress::new("/a/{x,y}").unwrap());
    }
}
