//! OSC argument values

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::size;
use crate::{OscColor, OscMidiMessage, OscTimeTag, OscToken};

/// A single OSC argument
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OscValue {
    /// `i`
    Int(i32),
    /// `h`
    Long(i64),
    /// `f`
    Float(f32),
    /// `d`
    Double(f64),
    /// `T` / `F`
    Bool(bool),
    /// `s`
    String(String),
    /// `S`
    Symbol(String),
    /// `b`
    Blob(Vec<u8>),
    /// `c`
    Char(u8),
    /// `r`
    Color(OscColor),
    /// `m`
    Midi(OscMidiMessage),
    /// `t`
    TimeTag(OscTimeTag),
    /// `I`
    Impulse,
    /// `N`
    Null,
    /// `[` ... `]`
    Array(Vec<OscValue>),
}

impl OscValue {
    /// The wire token written in the type tag for this value
    pub fn token(&self) -> OscToken {
        match self {
            OscValue::Int(_) => OscToken::Int,
            OscValue::Long(_) => OscToken::Long,
            OscValue::Float(_) => OscToken::Float,
            OscValue::Double(_) => OscToken::Double,
            OscValue::Bool(true) => OscToken::True,
            OscValue::Bool(false) => OscToken::False,
            OscValue::String(_) => OscToken::String,
            OscValue::Symbol(_) => OscToken::Symbol,
            OscValue::Blob(_) => OscToken::Blob,
            OscValue::Char(_) => OscToken::Char,
            OscValue::Color(_) => OscToken::Color,
            OscValue::Midi(_) => OscToken::Midi,
            OscValue::TimeTag(_) => OscToken::TimeTag,
            OscValue::Impulse => OscToken::Impulse,
            OscValue::Null => OscToken::Null,
            OscValue::Array(_) => OscToken::ArrayStart,
        }
    }

    /// Bytes this value occupies in the argument section
    pub fn size_in_bytes(&self) -> usize {
        match self {
            OscValue::Int(_)
            | OscValue::Float(_)
            | OscValue::Char(_)
            | OscValue::Color(_)
            | OscValue::Midi(_) => 4,
            OscValue::Long(_) | OscValue::Double(_) | OscValue::TimeTag(_) => 8,
            OscValue::Bool(_) | OscValue::Impulse | OscValue::Null => 0,
            OscValue::String(s) | OscValue::Symbol(s) => size::string_size(s),
            OscValue::Blob(b) => size::blob_size(b),
            OscValue::Array(items) => size::arguments_size(items),
        }
    }

    /// Characters this value contributes to the type tag
    pub fn type_tag_len(&self) -> usize {
        match self {
            OscValue::Array(items) => 2 + size::type_tag_len(items),
            _ => 1,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, OscValue::Null)
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            OscValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OscValue::Long(i) => Some(*i),
            OscValue::Int(i) => Some(*i as i64),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            OscValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OscValue::Double(d) => Some(*d),
            OscValue::Float(f) => Some(*f as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OscValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String contents; `None` for non-strings
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            OscValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            OscValue::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[OscValue]> {
        match self {
            OscValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for OscValue {
    /// Floats compare by bit pattern so decoded NaNs equal their source
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OscValue::Int(a), OscValue::Int(b)) => a == b,
            (OscValue::Long(a), OscValue::Long(b)) => a == b,
            (OscValue::Float(a), OscValue::Float(b)) => a.to_bits() == b.to_bits(),
            (OscValue::Double(a), OscValue::Double(b)) => a.to_bits() == b.to_bits(),
            (OscValue::Bool(a), OscValue::Bool(b)) => a == b,
            (OscValue::String(a), OscValue::String(b)) => a == b,
            (OscValue::Symbol(a), OscValue::Symbol(b)) => a == b,
            (OscValue::Blob(a), OscValue::Blob(b)) => a == b,
            (OscValue::Char(a), OscValue::Char(b)) => a == b,
            (OscValue::Color(a), OscValue::Color(b)) => a == b,
            (OscValue::Midi(a), OscValue::Midi(b)) => a == b,
            (OscValue::TimeTag(a), OscValue::TimeTag(b)) => a == b,
            (OscValue::Impulse, OscValue::Impulse) => true,
            (OscValue::Null, OscValue::Null) => true,
            (OscValue::Array(a), OscValue::Array(b)) => a == b,
            _ => false,
        }
    }
}

// Conversions

impl From<i32> for OscValue {
    fn from(v: i32) -> Self {
        OscValue::Int(v)
    }
}

impl From<i64> for OscValue {
    fn from(v: i64) -> Self {
        OscValue::Long(v)
    }
}

impl From<f32> for OscValue {
    fn from(v: f32) -> Self {
        OscValue::Float(v)
    }
}

impl From<f64> for OscValue {
    fn from(v: f64) -> Self {
        OscValue::Double(v)
    }
}

impl From<bool> for OscValue {
    fn from(v: bool) -> Self {
        OscValue::Bool(v)
    }
}

impl From<&str> for OscValue {
    fn from(v: &str) -> Self {
        OscValue::String(v.to_string())
    }
}

impl From<String> for OscValue {
    fn from(v: String) -> Self {
        OscValue::String(v)
    }
}

impl From<Vec<u8>> for OscValue {
    fn from(v: Vec<u8>) -> Self {
        OscValue::Blob(v)
    }
}

impl From<&[u8]> for OscValue {
    fn from(v: &[u8]) -> Self {
        OscValue::Blob(v.to_vec())
    }
}

impl From<OscColor> for OscValue {
    fn from(v: OscColor) -> Self {
        OscValue::Color(v)
    }
}

impl From<OscMidiMessage> for OscValue {
    fn from(v: OscMidiMessage) -> Self {
        OscValue::Midi(v)
    }
}

impl From<OscTimeTag> for OscValue {
    fn from(v: OscTimeTag) -> Self {
        OscValue::TimeTag(v)
    }
}

impl From<Vec<OscValue>> for OscValue {
    fn from(v: Vec<OscValue>) -> Self {
        OscValue::Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(OscValue::Bool(true).token(), OscToken::True);
        assert_eq!(OscValue::Bool(false).token(), OscToken::False);
        assert_eq!(OscValue::Array(vec![]).token(), OscToken::ArrayStart);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(OscValue::Int(1).size_in_bytes(), 4);
        assert_eq!(OscValue::TimeTag(OscTimeTag(0)).size_in_bytes(), 8);
        assert_eq!(OscValue::from("hello!").size_in_bytes(), 8);
        assert_eq!(OscValue::from("four").size_in_bytes(), 8);
        assert_eq!(OscValue::Blob(vec![3, 2, 1]).size_in_bytes(), 8);
        assert_eq!(OscValue::Blob(vec![]).size_in_bytes(), 4);
        assert_eq!(OscValue::Null.size_in_bytes(), 0);

        let nested = OscValue::Array(vec![OscValue::Int(1), OscValue::Array(vec![OscValue::Long(2)])]);
        assert_eq!(nested.size_in_bytes(), 12);
        assert_eq!(nested.type_tag_len(), 6);
    }

    #[test]
    fn test_nan_equality() {
        assert_eq!(OscValue::Float(f32::NAN), OscValue::Float(f32::NAN));
        assert_ne!(OscValue::Float(0.0), OscValue::Float(-0.0));
        assert_ne!(OscValue::Int(1), OscValue::Long(1));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(OscValue::Int(7).as_i64(), Some(7));
        assert_eq!(OscValue::from("x").as_str(), Some("x"));
        assert_eq!(OscValue::Symbol("x".into()).as_str(), None);
        assert_eq!(OscValue::Symbol("x".into()).as_symbol(), Some("x"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_json() {
        let value = OscValue::Array(vec![
            OscValue::Int(1),
            OscValue::Color(OscColor::new(1, 2, 3, 4)),
            OscValue::Null,
        ]);
        let json = serde_json::to_string(&value).unwrap();
        let back: OscValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
