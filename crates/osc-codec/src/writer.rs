//! Binary writer
//!
//! Call order for a message is enforced:
//! `start_message` -> `write_address` -> `write_type_tag`* ->
//! `write_type_tag_end` -> argument writes. Anything else fails with
//! [`Error::UnexpectedWriterState`].

use bytes::{BufMut, Bytes, BytesMut};

use crate::size;
use crate::{Error, OscColor, OscMidiMessage, OscTimeTag, OscToken, OscValue, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    NotStarted,
    Address,
    TypeTag,
    Arguments,
}

/// Writer appending OSC packets to a growable buffer
#[derive(Debug)]
pub struct OscWriter {
    buf: BytesMut,
    state: WriterState,
}

impl Default for OscWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OscWriter {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            state: WriterState::NotStarted,
        }
    }

    /// Bytes written so far
    #[inline]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Copy everything written so far into `dst`, returning the byte count.
    /// Fails without writing if `dst` cannot hold it all.
    pub fn flush_into<B: BufMut>(&self, dst: &mut B) -> Result<usize> {
        let len = self.buf.len();
        if dst.remaining_mut() < len {
            return Err(Error::InvalidSegmentLength(format!(
                "{} bytes to write, {} available",
                len,
                dst.remaining_mut()
            )));
        }
        dst.put_slice(&self.buf);
        Ok(len)
    }

    /// Discard everything written and return to `NotStarted`
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = WriterState::NotStarted;
    }

    // ============ Structure ============

    pub fn start_message(&mut self) {
        self.state = WriterState::Address;
    }

    /// Write the bundle ident and time tag
    pub fn start_bundle(&mut self, ident: &str, timestamp: OscTimeTag) {
        self.start_message();
        self.put_str(ident);
        self.buf.put_u64(timestamp.value());
    }

    /// Length prefix of the next bundle element
    pub fn write_bundle_message_length(&mut self, length: usize) {
        self.buf.put_i32(length as i32);
    }

    /// Write the address followed by the type tag comma
    pub fn write_address(&mut self, address: &str) -> Result<()> {
        self.check_state(WriterState::Address)?;
        self.put_str(address);
        self.buf.put_u8(b',');
        self.state = WriterState::TypeTag;
        Ok(())
    }

    pub fn write_type_tag(&mut self, token: OscToken) -> Result<()> {
        self.check_state(WriterState::TypeTag)?;
        let tag = token.type_tag().ok_or_else(|| {
            Error::UnexpectedToken(format!("unexpected token {:?}", token))
        })?;
        self.buf.put_u8(tag);
        Ok(())
    }

    /// Terminate and pad the type tag; arguments may follow
    pub fn write_type_tag_end(&mut self) -> Result<()> {
        self.check_state(WriterState::TypeTag)?;
        self.buf.put_u8(0);
        self.pad();
        self.state = WriterState::Arguments;
        Ok(())
    }

    // ============ Arguments ============

    pub fn write_int(&mut self, value: i32) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_i32(value);
        Ok(())
    }

    pub fn write_long(&mut self, value: i64) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_i64(value);
        Ok(())
    }

    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_f32(value);
        Ok(())
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_f64(value);
        Ok(())
    }

    /// One byte followed by three zero bytes
    pub fn write_char(&mut self, value: u8) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_u8(value);
        self.buf.put_bytes(0, 3);
        Ok(())
    }

    pub fn write_color(&mut self, value: OscColor) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_u32(value.to_rgba());
        Ok(())
    }

    pub fn write_midi(&mut self, value: OscMidiMessage) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_u32(value.full_message());
        Ok(())
    }

    pub fn write_time_tag(&mut self, value: OscTimeTag) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_u64(value.value());
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.put_str(value);
        Ok(())
    }

    pub fn write_symbol(&mut self, value: &str) -> Result<()> {
        self.write_string(value)
    }

    pub fn write_blob(&mut self, value: &[u8]) -> Result<()> {
        self.check_state(WriterState::Arguments)?;
        self.buf.put_u32(value.len() as u32);
        self.buf.put_slice(value);
        self.pad();
        Ok(())
    }

    // ============ Values ============

    /// Write the type tag characters for `args`, brackets included
    pub fn write_type_tags(&mut self, args: &[OscValue]) -> Result<()> {
        for arg in args {
            if let OscValue::Array(items) = arg {
                self.write_type_tag(OscToken::ArrayStart)?;
                self.write_type_tags(items)?;
                self.write_type_tag(OscToken::ArrayEnd)?;
            } else {
                self.write_type_tag(arg.token())?;
            }
        }
        Ok(())
    }

    /// Write the payload of `args` in order; tag-only values write nothing
    pub fn write_arguments(&mut self, args: &[OscValue]) -> Result<()> {
        for arg in args {
            self.write_argument(arg)?;
        }
        Ok(())
    }

    pub fn write_argument(&mut self, arg: &OscValue) -> Result<()> {
        match arg {
            OscValue::Int(v) => self.write_int(*v),
            OscValue::Long(v) => self.write_long(*v),
            OscValue::Float(v) => self.write_float(*v),
            OscValue::Double(v) => self.write_double(*v),
            OscValue::Char(v) => self.write_char(*v),
            OscValue::Color(v) => self.write_color(*v),
            OscValue::Midi(v) => self.write_midi(*v),
            OscValue::TimeTag(v) => self.write_time_tag(*v),
            OscValue::String(v) => self.write_string(v),
            OscValue::Symbol(v) => self.write_symbol(v),
            OscValue::Blob(v) => self.write_blob(v),
            OscValue::Array(items) => self.write_arguments(items),
            OscValue::Bool(_) | OscValue::Impulse | OscValue::Null => {
                self.check_state(WriterState::Arguments)
            }
        }
    }

    // ============ Internals ============

    fn check_state(&self, required: WriterState) -> Result<()> {
        if self.state != required {
            return Err(Error::UnexpectedWriterState(format!(
                "unexpected writer state {:?}",
                self.state
            )));
        }
        Ok(())
    }

    /// Bytes, terminator, padding
    fn put_str(&mut self, value: &str) {
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(0);
        self.pad();
    }

    fn pad(&mut self) {
        self.buf.put_bytes(0, size::padding(self.buf.len()));
    }
}
