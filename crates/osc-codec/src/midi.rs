//! 4-byte MIDI message argument (`m`)
//!
//! Packed as `port << 24 | status << 16 | data1 << 8 | data2`, which is also
//! the byte order on the wire.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Channel message type (high nibble of the status byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MidiMessageType {
    NoteOff = 0x80,
    NoteOn = 0x90,
    PolyPressure = 0xA0,
    ControlChange = 0xB0,
    ProgramChange = 0xC0,
    ChannelPressure = 0xD0,
    PitchBend = 0xE0,
    SystemExclusive = 0xF0,
}

impl MidiMessageType {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0x80 => Some(MidiMessageType::NoteOff),
            0x90 => Some(MidiMessageType::NoteOn),
            0xA0 => Some(MidiMessageType::PolyPressure),
            0xB0 => Some(MidiMessageType::ControlChange),
            0xC0 => Some(MidiMessageType::ProgramChange),
            0xD0 => Some(MidiMessageType::ChannelPressure),
            0xE0 => Some(MidiMessageType::PitchBend),
            0xF0 => Some(MidiMessageType::SystemExclusive),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MidiMessageType::NoteOff => "NoteOff",
            MidiMessageType::NoteOn => "NoteOn",
            MidiMessageType::PolyPressure => "PolyPressure",
            MidiMessageType::ControlChange => "ControlChange",
            MidiMessageType::ProgramChange => "ProgramChange",
            MidiMessageType::ChannelPressure => "ChannelPressure",
            MidiMessageType::PitchBend => "PitchBend",
            MidiMessageType::SystemExclusive => "SystemExclusive",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        [
            MidiMessageType::NoteOff,
            MidiMessageType::NoteOn,
            MidiMessageType::PolyPressure,
            MidiMessageType::ControlChange,
            MidiMessageType::ProgramChange,
            MidiMessageType::ChannelPressure,
            MidiMessageType::PitchBend,
            MidiMessageType::SystemExclusive,
        ]
        .into_iter()
        .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// System message type (low nibble of a 0xF# status byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MidiSystemMessageType {
    SystemExclusive = 0x00,
    TimeCode = 0x01,
    SongPosition = 0x02,
    SongSelect = 0x03,
    TuneRequest = 0x06,
    ClockTick = 0x08,
    Start = 0x0A,
    Continue = 0x0B,
    Stop = 0x0C,
    ActiveSense = 0x0E,
    SystemReset = 0x0F,
}

impl MidiSystemMessageType {
    const ALL: [MidiSystemMessageType; 11] = [
        MidiSystemMessageType::SystemExclusive,
        MidiSystemMessageType::TimeCode,
        MidiSystemMessageType::SongPosition,
        MidiSystemMessageType::SongSelect,
        MidiSystemMessageType::TuneRequest,
        MidiSystemMessageType::ClockTick,
        MidiSystemMessageType::Start,
        MidiSystemMessageType::Continue,
        MidiSystemMessageType::Stop,
        MidiSystemMessageType::ActiveSense,
        MidiSystemMessageType::SystemReset,
    ];

    pub fn from_u8(val: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| *t as u8 == val)
    }

    pub fn name(self) -> &'static str {
        match self {
            MidiSystemMessageType::SystemExclusive => "SystemExclusive",
            MidiSystemMessageType::TimeCode => "TimeCode",
            MidiSystemMessageType::SongPosition => "SongPosition",
            MidiSystemMessageType::SongSelect => "SongSelect",
            MidiSystemMessageType::TuneRequest => "TuneRequest",
            MidiSystemMessageType::ClockTick => "ClockTick",
            MidiSystemMessageType::Start => "Start",
            MidiSystemMessageType::Continue => "Continue",
            MidiSystemMessageType::Stop => "Stop",
            MidiSystemMessageType::ActiveSense => "ActiveSense",
            MidiSystemMessageType::SystemReset => "SystemReset",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// A MIDI message packed into 32 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OscMidiMessage(pub u32);

impl OscMidiMessage {
    /// Build from raw fields, data bytes are masked to 7 bits
    pub const fn new(port_id: u8, status_byte: u8, data1: u8, data2: u8) -> Self {
        Self(
            (port_id as u32) << 24
                | (status_byte as u32) << 16
                | ((data1 & 0x7F) as u32) << 8
                | (data2 & 0x7F) as u32,
        )
    }

    /// Build a channel message, `channel` must be below 16
    pub fn channel_message(
        port_id: u8,
        message_type: MidiMessageType,
        channel: u8,
        data1: u8,
        data2: u8,
    ) -> Result<Self> {
        if channel >= 16 {
            return Err(Error::ErrorParsingMidiMessage(format!(
                "channel {} out of range",
                channel
            )));
        }
        Ok(Self::new(port_id, message_type as u8 | channel, data1, data2))
    }

    /// Build a channel message carrying a 14-bit value split across both data bytes
    pub fn channel_message_14bit(
        port_id: u8,
        message_type: MidiMessageType,
        channel: u8,
        value: u16,
    ) -> Result<Self> {
        Self::channel_message(
            port_id,
            message_type,
            channel,
            (value & 0x7F) as u8,
            ((value & 0x3F80) >> 7) as u8,
        )
    }

    /// Build a system message
    pub const fn system_message(
        port_id: u8,
        message_type: MidiSystemMessageType,
        data1: u8,
        data2: u8,
    ) -> Self {
        Self::new(
            port_id,
            MidiMessageType::SystemExclusive as u8 | message_type as u8,
            data1,
            data2,
        )
    }

    #[inline]
    pub const fn full_message(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn port_id(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn status_byte(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn data1(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn data2(self) -> u8 {
        self.0 as u8
    }

    pub fn message_type(self) -> Option<MidiMessageType> {
        MidiMessageType::from_u8(self.status_byte() & 0xF0)
    }

    pub fn system_message_type(self) -> Option<MidiSystemMessageType> {
        MidiSystemMessageType::from_u8(self.status_byte() & 0x0F)
    }

    pub const fn channel(self) -> u8 {
        self.status_byte() & 0x0F
    }

    /// Both data bytes combined into a 14-bit value
    pub const fn data_14bit(self) -> u16 {
        (self.data1() & 0x7F) as u16 | ((self.data2() & 0x7F) as u16) << 7
    }

    /// Parse `port, type, channel, d1, d2` or `port, system-type, d1, d2`
    ///
    /// The status may also be given as a plain number.
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::ErrorParsingMidiMessage(format!(
                "not a midi message '{}'",
                s
            )));
        }
        let parts: Vec<&str> = s.split(',').collect();
        Self::from_parts(&parts)
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    pub(crate) fn from_parts(parts: &[&str]) -> Result<Self> {
        let invalid = || Error::ErrorParsingMidiMessage(format!("not a midi message '{}'", parts.join(",")));

        if parts.len() < 4 {
            return Err(invalid());
        }

        let byte = |text: &str| -> Result<u8> {
            text.trim()
                .parse::<u8>()
                .map_err(|_| Error::ErrorParsingMidiMessage(format!("invalid byte '{}'", text.trim())))
        };

        let mut index = 0;
        let port_id = byte(parts[index])?;
        index += 1;

        let status_text = parts[index].trim();
        let status_byte = match status_text.parse::<u8>() {
            Ok(status) => {
                index += 1;
                status
            }
            Err(_) => {
                if let Some(system) = MidiSystemMessageType::from_name(status_text) {
                    index += 1;
                    MidiMessageType::SystemExclusive as u8 | system as u8
                } else if let Some(message_type) = MidiMessageType::from_name(status_text) {
                    index += 1;
                    if parts.len() < 5 {
                        return Err(invalid());
                    }
                    let channel = byte(parts[index])?;
                    index += 1;
                    if channel > 15 {
                        return Err(Error::ErrorParsingMidiMessage(format!(
                            "channel {} out of range",
                            channel
                        )));
                    }
                    message_type as u8 | channel
                } else {
                    return Err(invalid());
                }
            }
        };

        let mut data = [0u8; 2];
        for slot in data.iter_mut() {
            let text = parts.get(index).ok_or_else(invalid)?;
            let value = byte(text)?;
            if value > 0x7F {
                return Err(Error::ErrorParsingMidiMessage(format!(
                    "data byte {} out of range",
                    value
                )));
            }
            *slot = value;
            index += 1;
        }

        if index != parts.len() {
            return Err(invalid());
        }

        Ok(Self::new(port_id, status_byte, data[0], data[1]))
    }
}

impl From<u32> for OscMidiMessage {
    fn from(value: u32) -> Self {
        OscMidiMessage(value)
    }
}

impl fmt::Display for OscMidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message_type() {
            Some(MidiMessageType::SystemExclusive) => {
                let system = self
                    .system_message_type()
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| self.status_byte().to_string());
                write!(
                    f,
                    "{}, {}, {}, {}",
                    self.port_id(),
                    system,
                    self.data1(),
                    self.data2()
                )
            }
            Some(message_type) => write!(
                f,
                "{}, {}, {}, {}, {}",
                self.port_id(),
                message_type.name(),
                self.channel(),
                self.data1(),
                self.data2()
            ),
            // status bytes below 0x80 are not valid MIDI, print them raw
            None => write!(
                f,
                "{}, {}, {}, {}",
                self.port_id(),
                self.status_byte(),
                self.data1(),
                self.data2()
            ),
        }
    }
}
