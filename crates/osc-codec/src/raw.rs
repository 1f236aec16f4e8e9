//! Zero-copy message and bundle views
//!
//! [`OscMessageRaw`] walks the argument layout once and records where each
//! argument starts. Values are decoded only when an accessor is called, and
//! strings and blobs borrow straight from the input buffer.

use std::ops::Index;

use crate::address;
use crate::reader::OscReader;
use crate::{
    Error, OscColor, OscMidiMessage, OscTimeTag, OscToken, OscValue, Result, TypeTag, BUNDLE_IDENT,
};

/// Location and type of one argument inside a raw message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OscArgument {
    /// Byte offset of the argument within the message
    pub position: usize,
    /// Argument token, or the shared element type for arrays
    pub token: OscToken,
    /// Elements, when this argument is an array
    pub array: Option<Vec<OscArgument>>,
}

impl OscArgument {
    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }
}

/// A message decoded lazily from a borrowed buffer
#[derive(Debug, Clone)]
pub struct OscMessageRaw<'a> {
    address: &'a str,
    arguments: Vec<OscArgument>,
    reader: OscReader<'a>,
    origin: Option<String>,
    timestamp: Option<OscTimeTag>,
}

impl<'a> OscMessageRaw<'a> {
    /// Index a message spanning all of `bytes`
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        Self::with_context(bytes, None, None)
    }

    pub fn with_context(
        bytes: &'a [u8],
        origin: Option<&str>,
        timestamp: Option<OscTimeTag>,
    ) -> Result<Self> {
        let mut reader = OscReader::new(bytes)?;
        reader.begin_message(bytes.len());

        let address = reader.read_address()?;
        if !address::is_valid_pattern(address) {
            return Err(Error::InvalidAddress(format!("invalid address \"{}\"", address)));
        }

        let arguments = if reader.peek_token() == OscToken::End {
            Vec::new()
        } else {
            let mut type_tag = reader.read_type_tag()?;
            let (count, _) = type_tag.argument_count()?;
            let mut position = reader.position();
            index_arguments(&reader, &mut type_tag, &mut position, count)?
        };

        Ok(Self {
            address,
            arguments,
            reader,
            origin: origin.map(str::to_string),
            timestamp,
        })
    }

    pub fn address(&self) -> &'a str {
        self.address
    }

    pub fn arguments(&self) -> &[OscArgument] {
        &self.arguments
    }

    pub fn get(&self, index: usize) -> Option<&OscArgument> {
        self.arguments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OscArgument> {
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

    /// Time tag of the innermost enclosing bundle
    pub fn timestamp(&self) -> Option<OscTimeTag> {
        self.timestamp
    }

    // ============ Accessors ============

    pub fn read_int(&self, argument: &OscArgument) -> Result<i32> {
        check(argument, OscToken::Int)?;
        self.reader.read_int_at(argument.position)
    }

    pub fn read_long(&self, argument: &OscArgument) -> Result<i64> {
        check(argument, OscToken::Long)?;
        self.reader.read_long_at(argument.position)
    }

    pub fn read_float(&self, argument: &OscArgument) -> Result<f32> {
        check(argument, OscToken::Float)?;
        self.reader.read_float_at(argument.position)
    }

    pub fn read_double(&self, argument: &OscArgument) -> Result<f64> {
        check(argument, OscToken::Double)?;
        self.reader.read_double_at(argument.position)
    }

    pub fn read_bool(&self, argument: &OscArgument) -> Result<bool> {
        check(argument, OscToken::Bool)?;
        Ok(argument.token == OscToken::True)
    }

    pub fn read_char(&self, argument: &OscArgument) -> Result<u8> {
        check(argument, OscToken::Char)?;
        self.reader.read_char_at(argument.position)
    }

    pub fn read_color(&self, argument: &OscArgument) -> Result<OscColor> {
        check(argument, OscToken::Color)?;
        self.reader.read_color_at(argument.position)
    }

    pub fn read_midi(&self, argument: &OscArgument) -> Result<OscMidiMessage> {
        check(argument, OscToken::Midi)?;
        self.reader.read_midi_at(argument.position)
    }

    pub fn read_time_tag(&self, argument: &OscArgument) -> Result<OscTimeTag> {
        check(argument, OscToken::TimeTag)?;
        self.reader.read_time_tag_at(argument.position)
    }

    /// A `N` argument reads as `None`
    pub fn read_string(&self, argument: &OscArgument) -> Result<Option<&'a str>> {
        if !argument.is_array() && argument.token == OscToken::Null {
            return Ok(None);
        }
        check(argument, OscToken::String)?;
        self.reader.read_string_at(argument.position).map(Some)
    }

    /// A `N` argument reads as `None`
    pub fn read_symbol(&self, argument: &OscArgument) -> Result<Option<&'a str>> {
        if !argument.is_array() && argument.token == OscToken::Null {
            return Ok(None);
        }
        check(argument, OscToken::Symbol)?;
        self.reader.read_string_at(argument.position).map(Some)
    }

    pub fn read_blob(&self, argument: &OscArgument) -> Result<&'a [u8]> {
        check(argument, OscToken::Blob)?;
        self.reader.read_blob_at(argument.position)
    }

    pub fn read_impulse(&self, argument: &OscArgument) -> Result<()> {
        check(argument, OscToken::Impulse)
    }

    /// Decode any argument, arrays included, into an owned value
    pub fn read_value(&self, argument: &OscArgument) -> Result<OscValue> {
        if let Some(elements) = &argument.array {
            return elements
                .iter()
                .map(|element| self.read_value(element))
                .collect::<Result<Vec<_>>>()
                .map(OscValue::Array);
        }

        let value = match argument.token {
            OscToken::Int => OscValue::Int(self.read_int(argument)?),
            OscToken::Long => OscValue::Long(self.read_long(argument)?),
            OscToken::Float => OscValue::Float(self.read_float(argument)?),
            OscToken::Double => OscValue::Double(self.read_double(argument)?),
            OscToken::True | OscToken::False => OscValue::Bool(self.read_bool(argument)?),
            OscToken::Char => OscValue::Char(self.read_char(argument)?),
            OscToken::Color => OscValue::Color(self.read_color(argument)?),
            OscToken::Midi => OscValue::Midi(self.read_midi(argument)?),
            OscToken::TimeTag => OscValue::TimeTag(self.read_time_tag(argument)?),
            OscToken::String => {
                OscValue::String(self.read_string(argument)?.unwrap_or_default().to_string())
            }
            OscToken::Symbol => {
                OscValue::Symbol(self.read_symbol(argument)?.unwrap_or_default().to_string())
            }
            OscToken::Blob => OscValue::Blob(self.read_blob(argument)?.to_vec()),
            OscToken::Impulse => OscValue::Impulse,
            OscToken::Null => OscValue::Null,
            other => {
                return Err(Error::UnexpectedToken(format!(
                    "unexpected token {:?}",
                    other
                )))
            }
        };
        Ok(value)
    }
}

impl Index<usize> for OscMessageRaw<'_> {
    type Output = OscArgument;

    fn index(&self, index: usize) -> &Self::Output {
        &self.arguments[index]
    }
}

impl<'r> IntoIterator for &'r OscMessageRaw<'_> {
    type Item = &'r OscArgument;
    type IntoIter = std::slice::Iter<'r, OscArgument>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.iter()
    }
}

fn check(argument: &OscArgument, expected: OscToken) -> Result<()> {
    if argument.is_array() {
        return Err(Error::UnexpectedToken("unexpected array".to_string()));
    }

    let matches = match expected {
        OscToken::Bool => matches!(argument.token, OscToken::True | OscToken::False),
        _ => argument.token == expected,
    };

    if !matches {
        return Err(Error::UnexpectedToken(format!(
            "unexpected token {:?}, expected {:?}",
            argument.token, expected
        )));
    }
    Ok(())
}

/// Record `count` arguments starting at the type tag's current token
fn index_arguments(
    reader: &OscReader<'_>,
    type_tag: &mut TypeTag<'_>,
    position: &mut usize,
    count: usize,
) -> Result<Vec<OscArgument>> {
    let mut arguments = Vec::with_capacity(count);

    for _ in 0..count {
        let token = type_tag.current()?;

        if token == OscToken::ArrayStart {
            let (length, element_type) = type_tag.array_element_count()?;
            type_tag.advance()?;

            let start = *position;
            let elements = index_arguments(reader, type_tag, position, length)?;
            arguments.push(OscArgument {
                position: start,
                token: element_type,
                array: Some(elements),
            });
        } else {
            let size = match token.fixed_size() {
                Some(size) => size,
                None => match token {
                    OscToken::String | OscToken::Symbol => reader.string_argument_size(*position)?,
                    OscToken::Blob => reader.blob_argument_size(*position)?,
                    other => {
                        return Err(Error::UnexpectedToken(format!(
                            "unexpected token {:?} in argument list",
                            other
                        )))
                    }
                },
            };

            if *position + size > reader.max_position() {
                return Err(Error::ErrorParsingArgument(format!(
                    "argument {} runs past the end of the message",
                    arguments.len()
                )));
            }

            arguments.push(OscArgument {
                position: *position,
                token,
                array: None,
            });
            *position += size;
        }

        type_tag.advance()?;
    }

    Ok(arguments)
}

/// Every message of a bundle, nested bundles flattened
#[derive(Debug, Clone)]
pub struct OscBundleRaw<'a> {
    timestamp: OscTimeTag,
    messages: Vec<OscMessageRaw<'a>>,
    origin: Option<String>,
}

impl<'a> OscBundleRaw<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        Self::with_origin(bytes, None)
    }

    pub fn with_origin(bytes: &'a [u8], origin: Option<&str>) -> Result<Self> {
        let mut reader = OscReader::new(bytes)?;
        let mut messages = Vec::new();
        let timestamp = read_messages(bytes, &mut reader, bytes.len(), origin, &mut messages)?;

        Ok(Self {
            timestamp,
            messages,
            origin: origin.map(str::to_string),
        })
    }

    /// Time tag of the outermost bundle
    pub fn timestamp(&self) -> OscTimeTag {
        self.timestamp
    }

    pub fn messages(&self) -> &[OscMessageRaw<'a>] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&OscMessageRaw<'a>> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OscMessageRaw<'a>> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

impl<'a> Index<usize> for OscBundleRaw<'a> {
    type Output = OscMessageRaw<'a>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.messages[index]
    }
}

impl<'r, 'a> IntoIterator for &'r OscBundleRaw<'a> {
    type Item = &'r OscMessageRaw<'a>;
    type IntoIter = std::slice::Iter<'r, OscMessageRaw<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Read the bundle of `count` bytes at the reader's position, pushing its
/// messages and returning its time tag
fn read_messages<'a>(
    bytes: &'a [u8],
    reader: &mut OscReader<'a>,
    count: usize,
    origin: Option<&str>,
    messages: &mut Vec<OscMessageRaw<'a>>,
) -> Result<OscTimeTag> {
    let start = reader.position();
    let end = start + count;

    reader.begin_bundle(count);

    let ident = reader.read_address()?;
    if ident != BUNDLE_IDENT {
        return Err(Error::InvalidBundleIdent(format!(
            "invalid bundle ident \"{}\"",
            ident
        )));
    }

    let timestamp = reader.read_bundle_time_tag()?;

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

        let element_start = reader.position();
        let element_end = element_start + length as usize;

        if reader.peek_byte() == Some(b'#') {
            read_messages(bytes, reader, length as usize, origin, messages)?;
        } else {
            messages.push(OscMessageRaw::with_context(
                &bytes[element_start..element_end],
                origin,
                Some(timestamp),
            )?);
        }

        reader.set_position(element_end);
    }

    Ok(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OscBundle, OscMessage, OscPacket};

    #[test]
    fn test_index_flat_arguments() {
        let message = OscMessage::new(
            "/raw",
            vec![
                OscValue::Int(7),
                OscValue::from("text"),
                OscValue::Blob(vec![1, 2, 3]),
                OscValue::Bool(true),
                OscValue::Double(2.5),
            ],
        )
        .unwrap();
        let bytes = message.to_bytes().unwrap();
        let raw = OscMessageRaw::new(&bytes).unwrap();

        assert_eq!(raw.address(), "/raw");
        assert_eq!(raw.len(), 5);
        assert_eq!(raw.read_int(&raw[0]).unwrap(), 7);
        assert_eq!(raw.read_string(&raw[1]).unwrap(), Some("text"));
        assert_eq!(raw.read_blob(&raw[2]).unwrap(), &[1, 2, 3]);
        assert!(raw.read_bool(&raw[3]).unwrap());
        assert_eq!(raw.read_double(&raw[4]).unwrap(), 2.5);
    }

    #[test]
    fn test_type_mismatch() {
        let message = OscMessage::new("/raw", vec![OscValue::Int(1)]).unwrap();
        let bytes = message.to_bytes().unwrap();
        let raw = OscMessageRaw::new(&bytes).unwrap();

        assert!(matches!(raw.read_float(&raw[0]), Err(Error::UnexpectedToken(_))));
    }

    #[test]
    fn test_arrays() {
        let message = OscMessage::new(
            "/raw",
            vec![
                OscValue::Int(1),
                OscValue::Array(vec![OscValue::Int(2), OscValue::Int(3)]),
                OscValue::Int(4),
            ],
        )
        .unwrap();
        let bytes = message.to_bytes().unwrap();
        let raw = OscMessageRaw::new(&bytes).unwrap();

        assert_eq!(raw.len(), 3);
        let array = &raw[1];
        assert!(array.is_array());
        assert_eq!(array.token, OscToken::Int);
        assert!(matches!(raw.read_int(array), Err(Error::UnexpectedToken(_))));

        let elements = array.array.as_ref().unwrap();
        assert_eq!(raw.read_int(&elements[1]).unwrap(), 3);
        assert_eq!(raw.read_int(&raw[2]).unwrap(), 4);
        assert_eq!(
            raw.read_value(array).unwrap(),
            OscValue::Array(vec![OscValue::Int(2), OscValue::Int(3)])
        );
    }

    #[test]
    fn test_null_string() {
        let message = OscMessage::new("/raw", vec![OscValue::Null]).unwrap();
        let bytes = message.to_bytes().unwrap();
        let raw = OscMessageRaw::new(&bytes).unwrap();

        assert_eq!(raw.read_string(&raw[0]).unwrap(), None);
        assert_eq!(raw.read_symbol(&raw[0]).unwrap(), None);
    }

    #[test]
    fn test_bundle_flattens_with_inner_timestamp() {
        let inner = OscBundle::new(
            OscTimeTag::new(2),
            vec![OscMessage::new("/inner", vec![]).unwrap().into()],
        );
        let outer = OscBundle::new(
            OscTimeTag::new(1),
            vec![
                OscMessage::new("/outer", vec![OscValue::Int(1)]).unwrap().into(),
                OscPacket::Bundle(inner),
            ],
        );
        let bytes = outer.to_bytes().unwrap();
        let raw = OscBundleRaw::with_origin(&bytes, Some("udp://127.0.0.1:9000")).unwrap();

        assert_eq!(raw.timestamp(), OscTimeTag::new(1));
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].address(), "/outer");
        assert_eq!(raw[0].timestamp(), Some(OscTimeTag::new(1)));
        assert_eq!(raw[1].address(), "/inner");
        assert_eq!(raw[1].timestamp(), Some(OscTimeTag::new(2)));
        assert_eq!(raw[1].origin(), Some("udp://127.0.0.1:9000"));
    }
}
