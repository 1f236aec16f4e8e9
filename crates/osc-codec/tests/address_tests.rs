//! Address validation and pattern matching tests

use osc_codec::address::{is_match, is_match_with, is_valid_literal, is_valid_pattern};
use osc_codec::{AddressPartKind, MatcherCache, OscAddress};

const GOOD_PATTERNS: &[(&str, &str)] = &[
    ("/container_A", "/container_A"),
    ("/container_A/method_A", "/container_A/method_A"),
    ("/0/1/2/3/4", "/0/1/2/3/4"),
    ("/container_A/[0-9]", "/container_A/3"),
    ("/container_A/[!0-9]", "/container_A/A"),
    ("/container_A/[abc]", "/container_A/ab"),
    ("/container_A/[!abc]", "/container_A/string"),
    ("/container_A/*g", "/container_A/string"),
    ("/container_A/?tr?ng", "/container_A/string"),
    ("/container_A/str?*", "/container_A/string"),
    ("/container_A/str*?", "/container_A/string"),
    ("/container_A/str**", "/container_A/string"),
    ("/container_A/f*ing", "/container_A/falsethinging"),
    ("/container_A/f?ing", "/container_A/fking"),
    ("/container_A/f?*s", "/container_A/fals"),
    ("/container_A/{method_A,method_B}", "/container_A/method_B"),
    ("/container_A/method_{A,B}", "/container_A/method_B"),
    ("/container_A/[method]_[A-Z]", "/container_A/method_B"),
    ("/container_A/[!string]_[0-9]", "/container_A/me_hod_3"),
    ("/container_A/{method,container}_[A-Z]", "/container_A/method_B"),
    (
        "//{method,container}_[A-Z]",
        "/container_A/container_B/container_C/method_B",
    ),
    ("/container_[Z-A]", "/container_B"),
];

const BAD_PATTERNS: &[&str] = &[
    "/",
    "/0//1",
    "/0/1/",
    "/ /1/",
    "///1/2",
    "/container A/1/",
    "/container_A/[0-9]]",
    "/container_A/[[!0-9]",
    "/container_A/{{method_A,method_B}",
    "/container_A/{method_A,method_B}}",
];

#[test]
fn test_good_patterns_are_valid() {
    for (pattern, _) in GOOD_PATTERNS {
        assert!(is_valid_pattern(pattern), "{} should be valid", pattern);
        assert!(OscAddress::new(pattern).is_ok(), "{} should parse", pattern);
    }
}

#[test]
fn test_bad_patterns_are_rejected() {
    for pattern in BAD_PATTERNS {
        assert!(!is_valid_pattern(pattern), "{} should be invalid", pattern);
        assert!(OscAddress::new(pattern).is_err(), "{} should not parse", pattern);
    }
}

#[test]
fn test_good_patterns_match() {
    for (pattern, address) in GOOD_PATTERNS {
        assert!(is_match(pattern, address), "{} should match {}", pattern, address);
    }
}

#[test]
fn test_patterns_rebuild_from_parts() {
    for (pattern, _) in GOOD_PATTERNS {
        let address = OscAddress::new(pattern).unwrap();
        let rebuilt: String = address.parts().iter().map(|p| p.interpreted()).collect();
        assert_eq!(&rebuilt, pattern);
        assert_eq!(&address.interpreted(), pattern);
    }
}

#[test]
fn test_literal_addresses() {
    assert!(is_valid_literal("/container_A/method_A"));
    assert!(!is_valid_literal("/container_A/*"));
    assert!(OscAddress::new("/container_A/method_A").unwrap().is_literal());
    assert!(!OscAddress::new("/container_A/*").unwrap().is_literal());
}

#[test]
fn test_part_kinds() {
    let address = OscAddress::new("//a*[0-9]{x,y}[abc]").unwrap();
    let kinds: Vec<AddressPartKind> = address.parts().iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            AddressPartKind::AddressWildcard,
            AddressPartKind::Literal,
            AddressPartKind::Wildcard,
            AddressPartKind::CharSpan,
            AddressPartKind::List,
            AddressPartKind::CharList,
        ]
    );
}

#[test]
fn test_wildcard_edge_cases() {
    let cases = [
        ("/?*test", "/test", false),
        ("/?*?test", "/test", false),
        ("/*?test", "/test", false),
        ("/?*test", "/1test", true),
        ("/?*test", "/1_test", true),
        ("/???test", "/123test", true),
        ("/???test", "/test", false),
        ("/???test??", "/test", false),
        ("/???test??", "/123test45", true),
        ("/???test*?", "/123test9", true),
    ];

    for (pattern, address, expected) in cases {
        assert_eq!(
            is_match(pattern, address),
            expected,
            "{} vs {}",
            pattern,
            address
        );
    }
}

#[test]
fn test_is_match_rejects_non_literal_address() {
    assert!(!is_match("/a/*", "/a/*"));
    assert!(!is_match("/a/*", "/a/"));
    assert!(!is_match("/a/[b", "/a/b"));
}

#[test]
fn test_star_does_not_cross_separator() {
    assert!(is_match("/a/*", "/a/b"));
    assert!(!is_match("/a/*", "/a/b/c"));
}

#[test]
fn test_literal_pattern_compares_text() {
    assert!(is_match("/a/b", "/a/b"));
    assert!(!is_match("/a/b", "/a/c"));
}

#[test]
fn test_cache_enabled_and_disabled() {
    let cache = MatcherCache::new();

    assert!(is_match_with("/mixer/[0-9]/fader", "/mixer/3/fader", &cache));
    assert_eq!(cache.len(), 1);
    assert!(is_match_with("/mixer/[0-9]/fader", "/mixer/4/fader", &cache));
    assert_eq!(cache.len(), 1);

    cache.set_enabled(false);
    assert!(!cache.is_enabled());
    assert!(is_match_with("/mixer/*/mute", "/mixer/3/mute", &cache));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_address_parse_from_str() {
    let address: OscAddress = "/synth/{osc1,osc2}/freq".parse().unwrap();
    assert!(address.matches("/synth/osc2/freq"));
    assert!(!address.matches("/synth/osc3/freq"));
    assert_eq!(address.to_string(), "/synth/{osc1,osc2}/freq");
}

#[test]
fn test_char_span_and_negation() {
    assert!(is_match("/[a-z]", "/m"));
    assert!(!is_match("/[!a-z]", "/m"));
    assert!(is_match("/[!a-z]", "/M"));
}

#[test]
fn test_negated_class_spans_separator() {
    assert!(is_match("/[!a-z]", "/A/B"));
    assert!(is_match("/[!abc]", "/X/Y"));
    assert!(is_match("/x/[!abc]", "/x/d/e"));
    assert!(!is_match("/[!a-z]", "/A/b"));

    let address = osc_codec::OscAddress::new("/[!a-z]").unwrap();
    assert_eq!(address.expression(), Some("^(/[^a-z]+)$"));
}

#[test]
fn test_char_span_direction_is_irrelevant() {
    for (low, high) in [('a', 'f'), ('0', '9'), ('A', 'z')] {
        let forward = format!("/[{}-{}]", low, high);
        let reversed = format!("/[{}-{}]", high, low);

        for c in (0x21u8..0x7F).map(char::from) {
            let address = format!("/{}", c);
            if !is_valid_literal(&address) {
                continue;
            }
            assert_eq!(
                is_match(&forward, &address),
                is_match(&reversed, &address),
                "{} vs {} on {}",
                forward,
                reversed,
                address
            );
        }
    }
}

#[test]
fn test_cache_transparency() {
    let cache = MatcherCache::new();
    let mut outcomes = Vec::new();

    for (pattern, address) in GOOD_PATTERNS {
        outcomes.push(is_match_with(pattern, address, &cache));
    }

    cache.set_enabled(false);
    for ((pattern, address), expected) in GOOD_PATTERNS.iter().zip(&outcomes) {
        assert_eq!(is_match_with(pattern, address, &cache), *expected);
    }

    cache.set_enabled(true);
    cache.clear();
    for ((pattern, address), expected) in GOOD_PATTERNS.iter().zip(&outcomes) {
        assert_eq!(is_match_with(pattern, address, &cache), *expected);
    }
}
