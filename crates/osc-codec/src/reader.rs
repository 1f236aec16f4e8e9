//! Forward-only binary reader
//!
//! The reader owns both the byte position and the type tag cursor. Each
//! `read_*` call checks the expected token, checks the remaining length,
//! decodes big-endian, skips padding and advances the type tag.

use bytes::Buf;

use crate::size;
use crate::{Error, OscColor, OscMidiMessage, OscTimeTag, OscToken, OscValue, Result, TypeTag};

/// Reader over a borrowed buffer
#[derive(Debug, Clone)]
pub struct OscReader<'a> {
    buffer: &'a [u8],
    position: usize,
    max_position: usize,
    token: OscToken,
    type_tag: TypeTag<'a>,
}

impl<'a> OscReader<'a> {
    /// Create a reader; the buffer length must be a multiple of 4
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        if buffer.len() % 4 != 0 {
            return Err(Error::InvalidSegmentLength(format!(
                "buffer length {} is not a multiple of 4",
                buffer.len()
            )));
        }

        Ok(Self {
            buffer,
            position: 0,
            max_position: buffer.len(),
            token: OscToken::None,
            type_tag: TypeTag::default(),
        })
    }

    // ============ Position and state ============

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// End of the packet currently being read
    #[inline]
    pub fn max_position(&self) -> usize {
        self.max_position
    }

    #[inline]
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// The token the next read is expected to consume
    #[inline]
    pub fn peek_token(&self) -> OscToken {
        self.token
    }

    #[inline]
    pub fn peek_byte(&self) -> Option<u8> {
        self.buffer.get(self.position).copied()
    }

    /// The type tag read by the last [`read_type_tag`](Self::read_type_tag)
    pub fn type_tag(&self) -> TypeTag<'a> {
        self.type_tag
    }

    /// Start reading a message of `count` bytes at the current position
    pub fn begin_message(&mut self, count: usize) {
        self.max_position = self.position + count;
        self.token = OscToken::OscAddress;
    }

    /// Start reading a bundle of `count` bytes at the current position
    pub fn begin_bundle(&mut self, count: usize) {
        self.max_position = self.position + count;
        self.token = OscToken::OscAddress;
    }

    // ============ Header ============

    /// Read the address (or bundle ident) string
    pub fn read_address(&mut self) -> Result<&'a str> {
        self.check_token(OscToken::OscAddress)?;

        let start = self.position;
        let end = self.find_terminator(start).ok_or_else(|| {
            Error::MissingAddress("address terminator could not be found".to_string())
        })?;

        if end == start {
            return Err(Error::MissingAddress("address was empty".to_string()));
        }

        let address = std::str::from_utf8(&self.buffer[start..end])
            .map_err(|e| Error::ErrorParsingOscAddress(e.to_string()))?;

        self.position = end + 1;
        if !self.skip_padding() {
            return Err(Error::InvalidSegmentLength(
                "unexpected end of message".to_string(),
            ));
        }

        self.token = if self.position == self.max_position {
            OscToken::End
        } else {
            OscToken::TypeTag
        };

        Ok(address)
    }

    /// Read the type tag string and position the cursor on its first token
    pub fn read_type_tag(&mut self) -> Result<TypeTag<'a>> {
        self.check_token(OscToken::TypeTag)?;

        if self.peek_byte() != Some(b',') || self.position >= self.max_position {
            return Err(Error::MissingComma("no comma found".to_string()));
        }
        self.position += 1;

        let start = self.position;
        let mut inset: i32 = 0;
        let end = loop {
            if self.position >= self.max_position {
                return Err(Error::MissingTypeTag(
                    "type tag terminator could not be found".to_string(),
                ));
            }

            let c = self.buffer[self.position];
            self.position += 1;

            match c {
                0 => break self.position - 1,
                b'[' => inset += 1,
                b']' => {
                    inset -= 1;
                    if inset < 0 {
                        return Err(Error::MalformedTypeTag(
                            "array end without a matching start".to_string(),
                        ));
                    }
                }
                _ => {}
            }
        };

        if inset != 0 {
            return Err(Error::MalformedTypeTag("unterminated array".to_string()));
        }

        if !self.skip_padding() {
            return Err(Error::InvalidSegmentLength(
                "unexpected end of message".to_string(),
            ));
        }

        self.type_tag = TypeTag::new(&self.buffer[start..end]);
        self.token = self.type_tag.current()?;

        Ok(self.type_tag)
    }

    /// Number of top-level arguments in the current type tag
    pub fn argument_count(&self) -> Result<(usize, OscToken)> {
        self.type_tag.argument_count()
    }

    // ============ Arrays ============

    /// Enter an array, returning its element count and shared element type
    pub fn start_array(&mut self) -> Result<(usize, OscToken)> {
        self.check_token(OscToken::ArrayStart)?;
        let length = self.type_tag.array_element_count()?;
        self.token = self.type_tag.advance()?;
        Ok(length)
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.check_token(OscToken::ArrayEnd)?;
        self.token = self.type_tag.advance()?;
        Ok(())
    }

    // ============ Arguments ============

    pub fn read_int(&mut self) -> Result<i32> {
        self.check_token(OscToken::Int)?;
        self.ensure(4, Error::ErrorParsingInt32)?;
        let value = self.field(self.position).get_i32();
        self.position += 4;
        self.next_token()?;
        Ok(value)
    }

    pub fn read_long(&mut self) -> Result<i64> {
        self.check_token(OscToken::Long)?;
        self.ensure(8, Error::ErrorParsingInt64)?;
        let value = self.field(self.position).get_i64();
        self.position += 8;
        self.next_token()?;
        Ok(value)
    }

    pub fn read_float(&mut self) -> Result<f32> {
        self.check_token(OscToken::Float)?;
        self.ensure(4, Error::ErrorParsingSingle)?;
        let value = self.field(self.position).get_f32();
        self.position += 4;
        self.next_token()?;
        Ok(value)
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.check_token(OscToken::Double)?;
        self.ensure(8, Error::ErrorParsingDouble)?;
        let value = self.field(self.position).get_f64();
        self.position += 8;
        self.next_token()?;
        Ok(value)
    }

    /// Read a `T` or `F` argument
    pub fn read_bool(&mut self) -> Result<bool> {
        self.check_token(OscToken::Bool)?;
        let value = self.token == OscToken::True;
        self.next_token()?;
        Ok(value)
    }

    pub fn read_char(&mut self) -> Result<u8> {
        self.check_token(OscToken::Char)?;
        self.ensure(4, Error::ErrorParsingChar)?;
        let value = self.buffer[self.position];
        self.position += 4;
        self.next_token()?;
        Ok(value)
    }

    pub fn read_color(&mut self) -> Result<OscColor> {
        self.check_token(OscToken::Color)?;
        self.ensure(4, Error::ErrorParsingColor)?;
        let value = OscColor::from_rgba(self.field(self.position).get_u32());
        self.position += 4;
        self.next_token()?;
        Ok(value)
    }

    pub fn read_midi(&mut self) -> Result<OscMidiMessage> {
        self.check_token(OscToken::Midi)?;
        self.ensure(4, Error::ErrorParsingMidiMessage)?;
        let value = OscMidiMessage(self.field(self.position).get_u32());
        self.position += 4;
        self.next_token()?;
        Ok(value)
    }

    pub fn read_time_tag(&mut self) -> Result<OscTimeTag> {
        self.check_token(OscToken::TimeTag)?;
        self.ensure(8, Error::ErrorParsingOscTimeTag)?;
        let value = OscTimeTag(self.field(self.position).get_u64());
        self.position += 8;
        self.next_token()?;
        Ok(value)
    }

    /// Read a string; a `N` in its place reads as `None`
    pub fn read_string(&mut self) -> Result<Option<&'a str>> {
        if self.token == OscToken::Null {
            self.next_token()?;
            return Ok(None);
        }
        self.check_token(OscToken::String)?;
        self.ensure(4, Error::ErrorParsingString)?;
        self.read_string_inner(Error::ErrorParsingString).map(Some)
    }

    /// Read a symbol; a `N` in its place reads as `None`
    pub fn read_symbol(&mut self) -> Result<Option<&'a str>> {
        if self.token == OscToken::Null {
            self.next_token()?;
            return Ok(None);
        }
        self.check_token(OscToken::Symbol)?;
        self.ensure(4, Error::ErrorParsingSymbol)?;
        self.read_string_inner(Error::ErrorParsingSymbol).map(Some)
    }

    /// Read a blob, borrowing its bytes from the buffer
    pub fn read_blob(&mut self) -> Result<&'a [u8]> {
        self.check_token(OscToken::Blob)?;
        self.ensure(4, Error::ErrorParsingBlob)?;
        let length = self.field(self.position).get_u32() as usize;
        self.position += 4;

        if length > 0 && self.position + length > self.max_position {
            return Err(Error::ErrorParsingBlob(format!(
                "unexpected end of message while parsing argument {}",
                self.type_tag.index()
            )));
        }

        let blob = &self.buffer[self.position..self.position + length];
        self.position += length;

        if !self.skip_padding() {
            return Err(Error::ErrorParsingBlob(format!(
                "unexpected end of message while parsing argument {}",
                self.type_tag.index()
            )));
        }

        self.next_token()?;
        Ok(blob)
    }

    pub fn read_impulse(&mut self) -> Result<()> {
        self.check_token(OscToken::Impulse)?;
        self.next_token()
    }

    pub fn read_null(&mut self) -> Result<()> {
        self.check_token(OscToken::Null)?;
        self.next_token()
    }

    /// Read whatever scalar argument the type tag announces next
    pub fn read_argument(&mut self) -> Result<OscValue> {
        let value = match self.token {
            OscToken::Char => OscValue::Char(self.read_char()?),
            OscToken::Bool | OscToken::True | OscToken::False => OscValue::Bool(self.read_bool()?),
            OscToken::String => {
                OscValue::String(self.read_string()?.unwrap_or_default().to_string())
            }
            OscToken::Symbol => {
                OscValue::Symbol(self.read_symbol()?.unwrap_or_default().to_string())
            }
            OscToken::Impulse => {
                self.read_impulse()?;
                OscValue::Impulse
            }
            OscToken::Null => {
                self.read_null()?;
                OscValue::Null
            }
            OscToken::Int => OscValue::Int(self.read_int()?),
            OscToken::Long => OscValue::Long(self.read_long()?),
            OscToken::Float => OscValue::Float(self.read_float()?),
            OscToken::Double => OscValue::Double(self.read_double()?),
            OscToken::TimeTag => OscValue::TimeTag(self.read_time_tag()?),
            OscToken::Blob => OscValue::Blob(self.read_blob()?.to_vec()),
            OscToken::Color => OscValue::Color(self.read_color()?),
            OscToken::Midi => OscValue::Midi(self.read_midi()?),
            other => {
                return Err(Error::UnexpectedToken(format!(
                    "expected argument token, got {:?}",
                    other
                )))
            }
        };
        Ok(value)
    }

    /// Read every remaining argument, descending into arrays
    pub fn read_arguments(&mut self) -> Result<Vec<OscValue>> {
        let (count, _) = self.argument_count()?;
        let mut arguments = Vec::with_capacity(count);
        self.read_argument_list(&mut arguments)?;
        Ok(arguments)
    }

    fn read_argument_list(&mut self, out: &mut Vec<OscValue>) -> Result<()> {
        loop {
            match self.token {
                OscToken::End => return Ok(()),
                OscToken::ArrayStart => {
                    let (length, _) = self.start_array()?;
                    let mut array = Vec::with_capacity(length);
                    self.read_argument_list(&mut array)?;
                    out.push(OscValue::Array(array));
                }
                OscToken::ArrayEnd => return self.end_array(),
                _ => out.push(self.read_argument()?),
            }
        }
    }

    // ============ Bundles ============

    /// Read the 8-byte time tag following the bundle ident
    pub fn read_bundle_time_tag(&mut self) -> Result<OscTimeTag> {
        self.check_token(OscToken::TypeTag)?;
        self.ensure(8, Error::ErrorParsingOscTimeTag)?;
        let value = OscTimeTag(self.field(self.position).get_u64());
        self.position += 8;
        self.token = OscToken::BundleMessageLength;
        Ok(value)
    }

    /// Read an element length prefix; restores the bounds of the enclosing
    /// bundle (`start`, `count`) first, since the previous element narrowed them
    pub fn read_bundle_message_length(&mut self, start: usize, count: usize) -> Result<i32> {
        self.check_token(OscToken::BundleMessageLength)?;
        self.max_position = start + count;
        self.ensure(4, Error::ErrorParsingInt32)?;
        let value = self.field(self.position).get_i32();
        self.position += 4;
        Ok(value)
    }

    // ============ Positional reads ============

    /// Bytes used by the string argument at `position`, including padding
    pub fn string_argument_size(&self, position: usize) -> Result<usize> {
        let end = self.find_terminator(position).ok_or_else(|| {
            Error::ErrorParsingString(
                "terminator could not be found while getting string length".to_string(),
            )
        })?;
        Ok(size::padded(end + 1 - position))
    }

    /// Bytes used by the blob argument at `position`, including prefix and padding
    pub fn blob_argument_size(&self, position: usize) -> Result<usize> {
        self.ensure_at(position, 4, Error::ErrorParsingBlob)?;
        let length = self.field(position).get_u32() as usize;
        Ok(4 + size::padded(length))
    }

    pub fn read_int_at(&self, position: usize) -> Result<i32> {
        self.ensure_at(position, 4, Error::ErrorParsingInt32)?;
        Ok(self.field(position).get_i32())
    }

    pub fn read_long_at(&self, position: usize) -> Result<i64> {
        self.ensure_at(position, 8, Error::ErrorParsingInt64)?;
        Ok(self.field(position).get_i64())
    }

    pub fn read_float_at(&self, position: usize) -> Result<f32> {
        self.ensure_at(position, 4, Error::ErrorParsingSingle)?;
        Ok(self.field(position).get_f32())
    }

    pub fn read_double_at(&self, position: usize) -> Result<f64> {
        self.ensure_at(position, 8, Error::ErrorParsingDouble)?;
        Ok(self.field(position).get_f64())
    }

    pub fn read_char_at(&self, position: usize) -> Result<u8> {
        self.ensure_at(position, 4, Error::ErrorParsingChar)?;
        Ok(self.buffer[position])
    }

    pub fn read_color_at(&self, position: usize) -> Result<OscColor> {
        self.ensure_at(position, 4, Error::ErrorParsingColor)?;
        Ok(OscColor::from_rgba(self.field(position).get_u32()))
    }

    pub fn read_midi_at(&self, position: usize) -> Result<OscMidiMessage> {
        self.ensure_at(position, 4, Error::ErrorParsingMidiMessage)?;
        Ok(OscMidiMessage(self.field(position).get_u32()))
    }

    pub fn read_time_tag_at(&self, position: usize) -> Result<OscTimeTag> {
        self.ensure_at(position, 8, Error::ErrorParsingOscTimeTag)?;
        Ok(OscTimeTag(self.field(position).get_u64()))
    }

    pub fn read_string_at(&self, position: usize) -> Result<&'a str> {
        self.ensure_at(position, 4, Error::ErrorParsingString)?;
        let end = self.find_terminator(position).ok_or_else(|| {
            Error::ErrorParsingString("terminator could not be found while parsing string".to_string())
        })?;
        std::str::from_utf8(&self.buffer[position..end])
            .map_err(|e| Error::ErrorParsingString(e.to_string()))
    }

    pub fn read_blob_at(&self, position: usize) -> Result<&'a [u8]> {
        self.ensure_at(position, 4, Error::ErrorParsingBlob)?;
        let length = self.field(position).get_u32() as usize;
        let start = position + 4;
        if length > 0 && start + length > self.max_position {
            return Err(Error::ErrorParsingBlob(
                "unexpected end of message while parsing blob".to_string(),
            ));
        }
        Ok(&self.buffer[start..start + length])
    }

    // ============ Internals ============

    #[inline]
    fn field(&self, position: usize) -> &'a [u8] {
        &self.buffer[position..]
    }

    #[inline]
    fn next_token(&mut self) -> Result<()> {
        self.token = self.type_tag.advance()?;
        Ok(())
    }

    fn check_token(&self, expected: OscToken) -> Result<()> {
        if self.token == expected {
            return Ok(());
        }

        if expected == OscToken::Bool
            && matches!(self.token, OscToken::True | OscToken::False)
        {
            return Ok(());
        }

        if expected == OscToken::BundleMessageLength && self.token == OscToken::End {
            return Ok(());
        }

        Err(Error::UnexpectedToken(format!(
            "unexpected token {:?}, expected {:?}",
            self.token, expected
        )))
    }

    #[inline]
    fn ensure(&self, count: usize, error: fn(String) -> Error) -> Result<()> {
        if self.position + count > self.max_position {
            return Err(error(format!(
                "unexpected end of message while parsing argument {}",
                self.type_tag.index()
            )));
        }
        Ok(())
    }

    #[inline]
    fn ensure_at(&self, position: usize, count: usize, error: fn(String) -> Error) -> Result<()> {
        if position + count > self.max_position {
            return Err(error(format!(
                "unexpected end of message at offset {}",
                position
            )));
        }
        Ok(())
    }

    /// Index of the first zero byte at or after `start`, within the packet
    fn find_terminator(&self, start: usize) -> Option<usize> {
        let end = self.max_position.min(self.buffer.len());
        if start >= end {
            return None;
        }
        self.buffer[start..end]
            .iter()
            .position(|b| *b == 0)
            .map(|offset| start + offset)
    }

    fn read_string_inner(&mut self, error: fn(String) -> Error) -> Result<&'a str> {
        let start = self.position;
        let end = self.find_terminator(start).ok_or_else(|| {
            error(format!(
                "terminator could not be found while parsing argument {}",
                self.type_tag.index()
            ))
        })?;

        let value = std::str::from_utf8(&self.buffer[start..end]).map_err(|e| error(e.to_string()))?;

        self.position = end + 1;
        if !self.skip_padding() {
            return Err(error(format!(
                "unexpected end of message while parsing argument {}",
                self.type_tag.index()
            )));
        }

        self.next_token()?;
        Ok(value)
    }

    fn skip_padding(&mut self) -> bool {
        let next = size::padded(self.position);
        if next > self.max_position {
            return false;
        }
        self.position = next;
        true
    }
}
