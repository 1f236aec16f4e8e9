//! Message-or-bundle dispatch

use std::fmt;

use bytes::{BufMut, Bytes};
use tracing::trace;

use crate::reader::OscReader;
use crate::text;
use crate::writer::OscWriter;
use crate::{Error, OscBundle, OscMessage, OscTimeTag, Result};

/// Anything that can travel as one OSC datagram
#[derive(Debug, Clone, PartialEq)]
pub enum OscPacket {
    Message(OscMessage),
    Bundle(OscBundle),
}

impl OscPacket {
    pub fn is_bundle(&self) -> bool {
        matches!(self, OscPacket::Bundle(_))
    }

    pub fn as_message(&self) -> Option<&OscMessage> {
        match self {
            OscPacket::Message(message) => Some(message),
            OscPacket::Bundle(_) => None,
        }
    }

    pub fn as_bundle(&self) -> Option<&OscBundle> {
        match self {
            OscPacket::Bundle(bundle) => Some(bundle),
            OscPacket::Message(_) => None,
        }
    }

    pub fn origin(&self) -> Option<&str> {
        match self {
            OscPacket::Message(message) => message.origin(),
            OscPacket::Bundle(bundle) => bundle.origin(),
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        match self {
            OscPacket::Message(message) => message.size_in_bytes(),
            OscPacket::Bundle(bundle) => bundle.size_in_bytes(),
        }
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            OscPacket::Message(message) => message.to_bytes(),
            OscPacket::Bundle(bundle) => bundle.to_bytes(),
        }
    }

    /// Encode into a caller-provided buffer, returning the bytes written
    pub fn write_into<B: BufMut>(&self, dst: &mut B) -> Result<usize> {
        match self {
            OscPacket::Message(message) => message.write_into(dst),
            OscPacket::Bundle(bundle) => bundle.write_into(dst),
        }
    }

    pub fn write(&self, writer: &mut OscWriter) -> Result<()> {
        match self {
            OscPacket::Message(message) => message.write(writer),
            OscPacket::Bundle(bundle) => bundle.write(writer),
        }
    }

    /// Decode a packet, treating a leading `#` as a bundle
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let mut reader = OscReader::new(bytes)?;
        Self::read_from(&mut reader, bytes.len(), None, None)
    }

    pub fn try_read(bytes: &[u8]) -> Option<Self> {
        Self::read(bytes).ok()
    }

    /// Same as [`read`](Self::read), recording `origin` on the result
    pub fn read_with_origin(bytes: &[u8], origin: &str) -> Result<Self> {
        let mut reader = OscReader::new(bytes)?;
        Self::read_from(&mut reader, bytes.len(), Some(origin), None)
    }

    /// Decode `count` bytes at the reader's position; `timestamp` is the
    /// time tag of the enclosing bundle, if any
    pub fn read_from(
        reader: &mut OscReader<'_>,
        count: usize,
        origin: Option<&str>,
        timestamp: Option<OscTimeTag>,
    ) -> Result<Self> {
        if count == 0 || reader.peek_byte().is_none() {
            return Err(Error::ErrorParsingPacket(format!(
                "empty packet at position {}",
                reader.position()
            )));
        }

        if reader.peek_byte() == Some(b'#') {
            trace!(position = reader.position(), count, "decoding bundle");
            return OscBundle::read_from(reader, count, origin).map(OscPacket::Bundle);
        }

        trace!(position = reader.position(), count, "decoding message");
        OscMessage::read_from(reader, count, origin, timestamp).map(OscPacket::Message)
    }

    pub fn parse(s: &str) -> Result<Self> {
        text::parse_packet(s)
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }
}

impl From<OscMessage> for OscPacket {
    fn from(message: OscMessage) -> Self {
        OscPacket::Message(message)
    }
}

impl From<OscBundle> for OscPacket {
    fn from(bundle: OscBundle) -> Self {
        OscPacket::Bundle(bundle)
    }
}

impl fmt::Display for OscPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscPacket::Message(message) => message.fmt(f),
            OscPacket::Bundle(bundle) => bundle.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OscValue;

    #[test]
    fn test_dispatch() {
        let message = OscMessage::new("/a", vec![OscValue::Int(1)]).unwrap();
        let bytes = message.to_bytes().unwrap();
        assert!(!OscPacket::read(&bytes).unwrap().is_bundle());

        let bundle = OscBundle::new(OscTimeTag::IMMEDIATE, vec![message.into()]);
        let bytes = bundle.to_bytes().unwrap();
        assert!(OscPacket::read(&bytes).unwrap().is_bundle());
    }

    #[test]
    fn test_origin_recorded() {
        let message = OscMessage::new("/a", vec![]).unwrap();
        let bundle = OscBundle::new(OscTimeTag(7), vec![message.into()]);
        let bytes = bundle.to_bytes().unwrap();

        let packet = OscPacket::read_with_origin(&bytes, "udp://10.0.0.1:8000").unwrap();
        assert_eq!(packet.origin(), Some("udp://10.0.0.1:8000"));
        let inner = &packet.as_bundle().unwrap().messages()[0];
        assert_eq!(inner.origin(), Some("udp://10.0.0.1:8000"));
    }
}
