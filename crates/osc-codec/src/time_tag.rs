//! NTP-style 64-bit time tags
//!
//! ```text
//! +--------------------------------+--------------------------------+
//! | seconds since 1900-01-01 (u32) |       fraction of a second     |
//! +--------------------------------+--------------------------------+
//! ```

use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Date/time formats accepted by [`OscTimeTag::parse`], tried in order
const DATE_TIME_FORMATS: &[&str] = &["%d-%m-%Y %H:%M:%S%.f", "%d-%m-%Y %H:%M:%S", "%d-%m-%Y %H:%M"];
const DATE_FORMATS: &[&str] = &["%d-%m-%y", "%d-%m-%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];

/// An OSC time tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OscTimeTag(pub u64);

impl OscTimeTag {
    /// The special "immediately" value
    pub const IMMEDIATE: OscTimeTag = OscTimeTag(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Whole seconds since 1900-01-01
    #[inline]
    pub const fn seconds(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Fractional part, in units of 1/2^32 seconds
    #[inline]
    pub const fn fraction(self) -> u32 {
        self.0 as u32
    }

    /// Seconds as a floating point value
    pub fn seconds_f64(self) -> f64 {
        self.seconds() as f64 + self.fraction() as f64 / u32::MAX as f64
    }

    /// The epoch of OSC time tags, 1900-01-01T00:00:00Z
    pub fn base_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Convert to a UTC date, precise to the millisecond
    pub fn to_datetime(self) -> DateTime<Utc> {
        let millis = (self.fraction() as f64 / u32::MAX as f64 * 1000.0).round() as i64;
        Self::base_date() + Duration::seconds(self.seconds() as i64) + Duration::milliseconds(millis)
    }

    /// Convert from a date, precise to the millisecond
    pub fn from_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        let span = datetime.with_timezone(&Utc) - Self::base_date();
        let total_millis = span.num_milliseconds();
        let seconds = total_millis.div_euclid(1000);
        let millis = total_millis.rem_euclid(1000);
        let fraction = (millis as f64 / 1000.0 * u32::MAX as f64).round() as u64;

        Self(((seconds as u64) & 0xFFFF_FFFF) << 32 | (fraction & 0xFFFF_FFFF))
    }

    /// Parse a time tag
    ///
    /// Accepts a date and/or time (`dd-MM-yyyy HH:mm:ss.ffff`, optionally
    /// suffixed with `Z` for UTC, local time otherwise), a hex value
    /// (`0x...`) or a plain integer holding the raw 64-bit value.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (text, utc) = match trimmed.strip_suffix('Z') {
            Some(rest) => (rest.trim_end_matches('Z'), true),
            None => (trimmed, false),
        };

        if let Some(naive) = parse_naive(text) {
            return Ok(Self::from_naive(naive, utc));
        }

        if let Some(hex) = text
            .strip_prefix("0x")
            .filter(|hex| !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()))
        {
            if let Ok(value) = u64::from_str_radix(hex, 16) {
                return Ok(Self(value));
            }
        }

        if let Ok(value) = text.parse::<u64>() {
            return Ok(Self(value));
        }

        Err(Error::ErrorParsingOscTimeTag(format!(
            "invalid osc-timetag string \"{}\"",
            s
        )))
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    fn from_naive(naive: NaiveDateTime, utc: bool) -> Self {
        if utc {
            return Self::from_datetime(Utc.from_utc_datetime(&naive));
        }
        match Local.from_local_datetime(&naive).earliest() {
            Some(local) => Self::from_datetime(local),
            None => Self::from_datetime(Utc.from_utc_datetime(&naive)),
        }
    }
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return Some(Local::now().date_naive().and_time(time));
        }
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

impl From<u64> for OscTimeTag {
    fn from(value: u64) -> Self {
        OscTimeTag(value)
    }
}

impl From<DateTime<Utc>> for OscTimeTag {
    fn from(datetime: DateTime<Utc>) -> Self {
        OscTimeTag::from_datetime(datetime)
    }
}

impl OscTimeTag {
    /// Text that parses back to exactly this tag: the UTC date when it is
    /// whole to the millisecond, the raw value in hex otherwise
    pub fn to_text(self) -> String {
        let date = self.to_string();
        match Self::parse(&date) {
            Ok(parsed) if parsed == self => date,
            _ => format!("0x{:016X}", self.0),
        }
    }
}

impl fmt::Display for OscTimeTag {
    /// Formats as `dd-MM-yyyy HH:mm:ss.ffffZ`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let datetime = self.to_datetime();
        write!(
            f,
            "{}.{:04}Z",
            datetime.format("%d-%m-%Y %H:%M:%S"),
            datetime.nanosecond() / 100_000
        )
    }
}
