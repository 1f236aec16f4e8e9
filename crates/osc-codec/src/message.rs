//! OSC messages

use std::fmt;

use bytes::{BufMut, Bytes};

use crate::address;
use crate::reader::OscReader;
use crate::size;
use crate::text::{self, TextWriter};
use crate::writer::OscWriter;
use crate::{Error, OscTimeTag, OscToken, OscValue, Result};

/// An address plus an ordered list of arguments
#[derive(Debug, Clone)]
pub struct OscMessage {
    address: String,
    arguments: Vec<OscValue>,
    origin: Option<String>,
    timestamp: Option<OscTimeTag>,
}

impl OscMessage {
    /// Create a message; the address must be a valid literal or pattern
    pub fn new(address: impl Into<String>, arguments: Vec<OscValue>) -> Result<Self> {
        let address = address.into();
        if !address::is_valid_pattern(&address) {
            return Err(Error::InvalidAddress(format!("invalid address \"{}\"", address)));
        }

        Ok(Self {
            address,
            arguments,
            origin: None,
            timestamp: None,
        })
    }

    /// Tag the message with where it came from
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: OscTimeTag) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn arguments(&self) -> &[OscValue] {
        &self.arguments
    }

    pub fn into_arguments(self) -> Vec<OscValue> {
        self.arguments
    }

    pub fn get(&self, index: usize) -> Option<&OscValue> {
        self.arguments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OscValue> {
        self.arguments.iter()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Time tag of the bundle this message was read from, if any
    pub fn timestamp(&self) -> Option<OscTimeTag> {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: Option<OscTimeTag>) {
        self.timestamp = timestamp;
    }

    /// Exact number of bytes [`to_bytes`](Self::to_bytes) produces
    pub fn size_in_bytes(&self) -> usize {
        size::message_size(&self.address, &self.arguments)
    }

    // ============ Binary ============

    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut writer = OscWriter::with_capacity(self.size_in_bytes());
        self.write(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Encode into a caller-provided buffer, returning the bytes written
    pub fn write_into<B: BufMut>(&self, dst: &mut B) -> Result<usize> {
        let mut writer = OscWriter::with_capacity(self.size_in_bytes());
        self.write(&mut writer)?;
        writer.flush_into(dst)
    }

    pub fn write(&self, writer: &mut OscWriter) -> Result<()> {
        writer.start_message();
        writer.write_address(&self.address)?;
        writer.write_type_tags(&self.arguments)?;
        writer.write_type_tag_end()?;
        writer.write_arguments(&self.arguments)
    }

    /// Decode a message occupying the whole of `bytes`
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let mut reader = OscReader::new(bytes)?;
        Self::read_from(&mut reader, bytes.len(), None, None)
    }

    pub fn try_read(bytes: &[u8]) -> Option<Self> {
        Self::read(bytes).ok()
    }

    /// Decode `count` bytes at the reader's current position
    pub fn read_from(
        reader: &mut OscReader<'_>,
        count: usize,
        origin: Option<&str>,
        timestamp: Option<OscTimeTag>,
    ) -> Result<Self> {
        reader.begin_message(count);

        let address = reader.read_address()?;
        if !address::is_valid_pattern(address) {
            return Err(Error::InvalidAddress(format!("invalid address \"{}\"", address)));
        }

        let arguments = if reader.peek_token() == OscToken::End {
            Vec::new()
        } else {
            reader.read_type_tag()?;
            reader.read_arguments()?
        };

        Ok(Self {
            address: address.to_string(),
            arguments,
            origin: origin.map(str::to_string),
            timestamp,
        })
    }

    // ============ Text ============

    /// Parse the textual form, e.g. `/test, 1, 2.5f, "three"`
    pub fn parse(s: &str) -> Result<Self> {
        text::parse_message(s)
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }
}

impl PartialEq for OscMessage {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.arguments == other.arguments
    }
}

impl<'a> IntoIterator for &'a OscMessage {
    type Item = &'a OscValue;
    type IntoIter = std::slice::Iter<'a, OscValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.iter()
    }
}

impl fmt::Display for OscMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = TextWriter::new();
        writer.write_message(self);
        f.write_str(writer.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_rejected() {
        assert!(matches!(
            OscMessage::new("no/slash", vec![]),
            Err(Error::InvalidAddress(_))
        ));
        assert!(OscMessage::new("", vec![]).is_err());
        assert!(OscMessage::new("/a/{b,c", vec![]).is_err());
    }

    #[test]
    fn test_pattern_address_allowed() {
        let msg = OscMessage::new("/a/*/[0-9]", vec![OscValue::Int(1)]).unwrap();
        assert_eq!(msg.address(), "/a/*/[0-9]");
    }

    #[test]
    fn test_size_matches_bytes() {
        let msg = OscMessage::new(
            "/test",
            vec![
                OscValue::Int(1),
                OscValue::from("hello"),
                OscValue::Array(vec![OscValue::Bool(true), OscValue::Double(2.0)]),
            ],
        )
        .unwrap();

        let bytes = msg.to_bytes().unwrap();
        assert_eq!(bytes.len(), msg.size_in_bytes());
        assert_eq!(OscMessage::read(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a = OscMessage::new("/a", vec![OscValue::Int(1)]).unwrap();
        let b = a.clone().with_origin("udp://127.0.0.1:9000");
        assert_eq!(a, b);
    }
}
