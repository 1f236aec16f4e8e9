//! Textual packet writer

use std::fmt::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::escape::escape;
use crate::{OscBundle, OscMessage, OscPacket, OscValue};

/// Builds the textual form of packets and values
#[derive(Debug, Default)]
pub struct TextWriter {
    out: String,
}

impl TextWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn write_packet(&mut self, packet: &OscPacket) {
        match packet {
            OscPacket::Message(message) => self.write_message(message),
            OscPacket::Bundle(bundle) => self.write_bundle(bundle),
        }
    }

    /// `<address>` or `<address>, <arguments>`
    pub fn write_message(&mut self, message: &OscMessage) {
        self.out.push_str(message.address());

        if message.is_empty() {
            return;
        }

        self.out.push_str(", ");
        self.write_values(message.arguments());
    }

    /// `#bundle, <time tag>` then `, { <packet> }` per packet
    pub fn write_bundle(&mut self, bundle: &OscBundle) {
        let _ = write!(self.out, "#bundle, {}", bundle.timestamp().to_text());

        for packet in bundle {
            self.out.push_str(", { ");
            self.write_packet(packet);
            self.out.push_str(" }");
        }
    }

    /// Comma separated values
    pub fn write_values(&mut self, values: &[OscValue]) {
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            self.write_value(value);
        }
    }

    pub fn write_value(&mut self, value: &OscValue) {
        // Writes into a String cannot fail
        let _ = match value {
            OscValue::Int(v) => write!(self.out, "{}", v),
            OscValue::Long(v) => write!(self.out, "{}L", v),
            OscValue::Float(v) => self.write_float(*v),
            OscValue::Double(v) => self.write_double(*v),
            OscValue::Bool(v) => write!(self.out, "{}", v),
            OscValue::String(v) => write!(self.out, "\"{}\"", escape(v)),
            OscValue::Symbol(v) => write!(self.out, "$\"{}\"", escape(v)),
            OscValue::Char(b'\'') => write!(self.out, "'\\''"),
            OscValue::Char(v) => write!(self.out, "'{}'", escape(&char::from(*v).to_string())),
            OscValue::Blob(v) => write!(self.out, "{{ Blob: 64x{} }}", STANDARD.encode(v)),
            OscValue::TimeTag(v) => write!(self.out, "{{ Time: {} }}", v.to_text()),
            OscValue::Midi(v) => write!(self.out, "{{ Midi: {} }}", v),
            OscValue::Color(v) => write!(self.out, "{{ Color: {} }}", v),
            OscValue::Impulse => write!(self.out, "impulse"),
            OscValue::Null => write!(self.out, "null"),
            OscValue::Array(items) => {
                self.out.push_str("[ ");
                self.write_values(items);
                self.out.push_str(" ]");
                Ok(())
            }
        };
    }

    fn write_float(&mut self, value: f32) -> std::fmt::Result {
        if value.is_nan() {
            write!(self.out, "NaN")
        } else if value.is_infinite() {
            write!(self.out, "{}", if value > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            write!(self.out, "{}f", value)
        }
    }

    fn write_double(&mut self, value: f64) -> std::fmt::Result {
        if value.is_nan() {
            write!(self.out, "NaNd")
        } else if value.is_infinite() {
            write!(self.out, "{}", if value > 0.0 { "Infinityd" } else { "-Infinityd" })
        } else {
            write!(self.out, "{}d", value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OscColor, OscTimeTag};

    fn text(value: OscValue) -> String {
        let mut writer = TextWriter::new();
        writer.write_value(&value);
        writer.into_string()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(text(OscValue::Int(42)), "42");
        assert_eq!(text(OscValue::Long(-3)), "-3L");
        assert_eq!(text(OscValue::Float(25.25)), "25.25f");
        assert_eq!(text(OscValue::Float(f32::NEG_INFINITY)), "-Infinity");
        assert_eq!(text(OscValue::Double(1.5)), "1.5d");
        assert_eq!(text(OscValue::Bool(true)), "true");
        assert_eq!(text(OscValue::Char(b'p')), "'p'");
        assert_eq!(text(OscValue::Char(b'\'')), "'\\''");
        assert_eq!(text(OscValue::Double(f64::NAN)), "NaNd");
        assert_eq!(text(OscValue::Null), "null");
        assert_eq!(text(OscValue::Impulse), "impulse");
    }

    #[test]
    fn test_objects() {
        assert_eq!(text(OscValue::Blob(vec![3, 2, 1])), "{ Blob: 64xAwIB }");
        assert_eq!(
            text(OscValue::Color(OscColor::new(1, 2, 3, 4))),
            "{ Color: 1, 2, 3, 4 }"
        );
        assert_eq!(
            text(OscValue::TimeTag(OscTimeTag(0))),
            "{ Time: 01-01-1900 00:00:00.0000Z }"
        );
    }

    #[test]
    fn test_strings_escaped() {
        assert_eq!(text(OscValue::from("a \"b\"")), "\"a \\\"b\\\"\"");
        assert_eq!(text(OscValue::Symbol("s".into())), "$\"s\"");
    }

    #[test]
    fn test_nested_array() {
        let value = OscValue::Array(vec![OscValue::Int(1), OscValue::Array(vec![OscValue::Int(2)])]);
        assert_eq!(text(value), "[ 1, [ 2 ] ]");
    }
}
