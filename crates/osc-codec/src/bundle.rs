//! OSC bundles
//!
//! ```text
//! +----------+-----------+--------+---------+--------+---------+----
//! | #bundle\0| time tag  | len u32| packet  | len u32| packet  | ...
//! | 8 bytes  | 8 bytes   |        | len B   |        | len B   |
//! +----------+-----------+--------+---------+--------+---------+----
//! ```

use std::fmt;

use bytes::{BufMut, Bytes};

use crate::reader::OscReader;
use crate::text::{self, TextWriter};
use crate::writer::OscWriter;
use crate::{Error, OscMessage, OscPacket, OscTimeTag, Result, BUNDLE_HEADER_SIZE, BUNDLE_IDENT};

/// A time tag and the packets scheduled for it
#[derive(Debug, Clone)]
pub struct OscBundle {
    timestamp: OscTimeTag,
    packets: Vec<OscPacket>,
    origin: Option<String>,
}

impl OscBundle {
    pub fn new(timestamp: OscTimeTag, packets: Vec<OscPacket>) -> Self {
        Self {
            timestamp,
            packets,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn timestamp(&self) -> OscTimeTag {
        self.timestamp
    }

    pub fn packets(&self) -> &[OscPacket] {
        &self.packets
    }

    pub fn into_packets(self) -> Vec<OscPacket> {
        self.packets
    }

    pub fn get(&self, index: usize) -> Option<&OscPacket> {
        self.packets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OscPacket> {
        self.packets.iter()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Every message in this bundle and its nested bundles, depth first
    pub fn messages(&self) -> Vec<&OscMessage> {
        let mut out = Vec::new();
        self.collect_messages(&mut out);
        out
    }

    fn collect_messages<'a>(&'a self, out: &mut Vec<&'a OscMessage>) {
        for packet in &self.packets {
            match packet {
                OscPacket::Message(message) => out.push(message),
                OscPacket::Bundle(bundle) => bundle.collect_messages(out),
            }
        }
    }

    /// Header plus a length prefix and the body of every packet
    pub fn size_in_bytes(&self) -> usize {
        BUNDLE_HEADER_SIZE
            + self
                .packets
                .iter()
                .map(|packet| 4 + packet.size_in_bytes())
                .sum::<usize>()
    }

    /// Whether `bytes` starts with a bundle header
    pub fn is_bundle(bytes: &[u8]) -> bool {
        bytes.len() >= BUNDLE_HEADER_SIZE && bytes.starts_with(BUNDLE_IDENT.as_bytes())
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
        writer.start_bundle(BUNDLE_IDENT, self.timestamp);

        for packet in &self.packets {
            writer.write_bundle_message_length(packet.size_in_bytes());
            packet.write(writer)?;
        }

        Ok(())
    }

    pub fn read(bytes: &[u8]) -> Result<Self> {
        let mut reader = OscReader::new(bytes)?;
        Self::read_from(&mut reader, bytes.len(), None)
    }

    pub fn try_read(bytes: &[u8]) -> Option<Self> {
        Self::read(bytes).ok()
    }

    /// Decode a bundle of `count` bytes at the reader's current position
    pub fn read_from(reader: &mut OscReader<'_>, count: usize, origin: Option<&str>) -> Result<Self> {
        let start = reader.position();
        let end = start + count;

        reader.begin_bundle(count);

        let ident = reader.read_address().map_err(|e| match e {
            Error::MissingAddress(context) => Error::MissingBundleIdent(context),
            other => other,
        })?;
        if ident != BUNDLE_IDENT {
            return Err(Error::InvalidBundleIdent(format!(
                "invalid bundle ident \"{}\"",
                ident
            )));
        }

        let timestamp = reader.read_bundle_time_tag()?;
        let mut packets = Vec::new();

        while reader.position() < end {
            if reader.position() + 4 > end {
                return Err(Error::InvalidBundleMessageHeader(
                    "invalid bundle message header".to_string(),
                ));
            }

            let length = reader.read_bundle_message_length(start, count)?;

            if length < 0 || length % 4 != 0 || reader.position() + length as usize > end {
                return Err(Error::InvalidBundleMessageLength(format!(
                    "invalid bundle message length {}",
                    length
                )));
            }

            let element_end = reader.position() + length as usize;
            packets.push(OscPacket::read_from(
                reader,
                length as usize,
                origin,
                Some(timestamp),
            )?);
            reader.set_position(element_end);
        }

        Ok(Self {
            timestamp,
            packets,
            origin: origin.map(str::to_string),
        })
    }

    // ============ Text ============

    /// Parse `#bundle, <time tag>, { <packet> }, ...`
    pub fn parse(s: &str) -> Result<Self> {
        text::parse_bundle(s)
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }
}

impl PartialEq for OscBundle {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.packets == other.packets
    }
}

impl<'a> IntoIterator for &'a OscBundle {
    type Item = &'a OscPacket;
    type IntoIter = std::slice::Iter<'a, OscPacket>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.iter()
    }
}

impl fmt::Display for OscBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = TextWriter::new();
        writer.write_bundle(self);
        f.write_str(writer.as_str())
    }
}
