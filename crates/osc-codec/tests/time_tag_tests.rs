//! Time tag tests

use chrono::{TimeZone, Utc};
use osc_codec::OscTimeTag;

#[test]
fn test_immediate() {
    assert_eq!(OscTimeTag::IMMEDIATE.value(), 1);
    assert_eq!(OscTimeTag::IMMEDIATE.seconds(), 0);
    assert_eq!(OscTimeTag::IMMEDIATE.fraction(), 1);
}

#[test]
fn test_datetime_roundtrip_to_millisecond() {
    let datetime = Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 45).unwrap()
        + chrono::Duration::milliseconds(250);
    let tag = OscTimeTag::from_datetime(datetime);

    assert_eq!(tag.to_datetime(), datetime);
    assert_eq!(tag.fraction(), 1 << 30);
}

#[test]
fn test_seconds_since_1900() {
    let datetime = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(OscTimeTag::from_datetime(datetime).seconds(), 2_208_988_800);
}

#[test]
fn test_parse_forms() {
    let utc = OscTimeTag::parse("01-01-1900 00:00:00.0000Z").unwrap();
    assert_eq!(utc, OscTimeTag::new(0));

    let date_only = OscTimeTag::parse("02-01-1900Z").unwrap();
    assert_eq!(date_only.seconds(), 86_400);

    assert_eq!(OscTimeTag::parse("0x100000000").unwrap().seconds(), 1);
    assert!(OscTimeTag::parse("32-13-2000").is_err());
    assert!(OscTimeTag::try_parse("").is_none());
}

#[test]
fn test_display() {
    let tag = OscTimeTag::from_datetime(Utc.with_ymd_and_hms(2005, 1, 14, 17, 58, 59).unwrap());
    assert_eq!(tag.to_string(), "14-01-2005 17:58:59.0000Z");
}

#[test]
fn test_ordering() {
    assert!(OscTimeTag::new(1) < OscTimeTag::new(2));
    assert!(OscTimeTag::IMMEDIATE < OscTimeTag::now());
}
