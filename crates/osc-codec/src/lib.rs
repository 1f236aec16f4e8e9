//! OSC Codec
//!
//! Binary and textual codec for Open Sound Control 1.0/1.1 packets.
//!
//! This crate provides:
//! - Packet object model ([`OscMessage`], [`OscBundle`], [`OscPacket`])
//! - Forward-only wire reader and writer ([`OscReader`], [`OscWriter`])
//! - Zero-copy views over received packets ([`OscMessageRaw`], [`OscBundleRaw`])
//! - Address validation and pattern matching ([`OscAddress`], [`MatcherCache`])
//! - A human readable text form ([`text`])
//!
//! ```
//! use osc_codec::{OscMessage, OscValue};
//!
//! let message = OscMessage::new("/mixer/3/fader", vec![OscValue::Float(0.5)]).unwrap();
//! let bytes = message.to_bytes().unwrap();
//! assert_eq!(OscMessage::read(&bytes).unwrap(), message);
//! assert_eq!(message.to_string(), "/mixer/3/fader, 0.5f");
//! ```

pub mod address;
pub mod bundle;
pub mod color;
pub mod error;
pub mod message;
pub mod midi;
pub mod packet;
pub mod raw;
pub mod reader;
pub mod size;
pub mod text;
pub mod time_tag;
pub mod token;
pub mod type_tag;
pub mod value;
pub mod writer;

pub use address::{AddressPart, AddressPartKind, MatcherCache, OscAddress};
pub use bundle::OscBundle;
pub use color::OscColor;
pub use error::{Error, ErrorCode, Result};
pub use message::OscMessage;
pub use midi::{MidiMessageType, MidiSystemMessageType, OscMidiMessage};
pub use packet::OscPacket;
pub use raw::{OscArgument, OscBundleRaw, OscMessageRaw};
pub use reader::OscReader;
pub use time_tag::OscTimeTag;
pub use token::OscToken;
pub use type_tag::TypeTag;
pub use value::OscValue;
pub use writer::{OscWriter, WriterState};

/// Address string that opens every bundle
pub const BUNDLE_IDENT: &str = "#bundle";

/// Padded ident plus the 8-byte time tag
pub const BUNDLE_HEADER_SIZE: usize = 16;
