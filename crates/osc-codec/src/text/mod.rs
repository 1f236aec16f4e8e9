//! Human readable packet form
//!
//! ```text
//! /mixer/3, 0.5f, "label", [ 1, 2 ], { Color: 255, 0, 0, 255 }
//! #bundle, 01-01-1900 00:00:00.0000Z, { /a, 1 }, { /b, 2 }
//! ```
//!
//! This is not part of the OSC standard; it exists for logging, tests and
//! configuration files.

mod escape;
mod tokenizer;
mod writer;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub use escape::{escape, is_valid_escape, unescape};
pub use tokenizer::{TextToken, Tokenizer};
pub use writer::TextWriter;

use crate::address;
use crate::{
    Error, OscBundle, OscColor, OscMessage, OscMidiMessage, OscPacket, OscTimeTag, OscValue, Result,
    BUNDLE_IDENT,
};

/// Parse a message or, with a leading `#`, a bundle
pub fn parse_packet(s: &str) -> Result<OscPacket> {
    let mut tokenizer = start(s)?;
    read_packet(&mut tokenizer, TextToken::End)
}

pub fn parse_message(s: &str) -> Result<OscMessage> {
    let mut tokenizer = start(s)?;
    read_message(&mut tokenizer, TextToken::End)
}

pub fn parse_bundle(s: &str) -> Result<OscBundle> {
    let mut tokenizer = start(s)?;
    read_bundle(&mut tokenizer, TextToken::End)
}

/// Parse a comma separated argument list, e.g. `1, 2.5f, "three"`
pub fn parse_values(s: &str) -> Result<Vec<OscValue>> {
    let mut tokenizer = Tokenizer::new(s);
    read_arguments(&mut tokenizer, TextToken::End)
}

fn start(s: &str) -> Result<Tokenizer<'_>> {
    if s.trim().is_empty() {
        return Err(Error::InvalidValue("input is empty".to_string()));
    }
    Ok(Tokenizer::new(s))
}

// ============ Packets ============

fn read_packet(tokenizer: &mut Tokenizer<'_>, end: TextToken) -> Result<OscPacket> {
    if tokenizer.peek_char() == Some('#') {
        return read_bundle(tokenizer, end).map(OscPacket::Bundle);
    }
    read_message(tokenizer, end).map(OscPacket::Message)
}

fn read_address<'a>(tokenizer: &mut Tokenizer<'a>) -> Result<&'a str> {
    match tokenizer.next_token()? {
        (TextToken::Literal, value) => Ok(value.trim()),
        (token, _) => Err(Error::ErrorParsingOscAddress(format!(
            "unexpected serialization token {:?}",
            token
        ))),
    }
}

fn read_message(tokenizer: &mut Tokenizer<'_>, end: TextToken) -> Result<OscMessage> {
    let address = read_address(tokenizer)?;

    if !address::is_valid_pattern(address) {
        return Err(Error::InvalidAddress(format!("invalid address \"{}\"", address)));
    }

    let arguments = read_arguments(tokenizer, end)?;
    OscMessage::new(address, arguments)
}

fn read_bundle(tokenizer: &mut Tokenizer<'_>, end: TextToken) -> Result<OscBundle> {
    let ident = read_address(tokenizer)?;
    if ident != BUNDLE_IDENT {
        return Err(Error::InvalidBundleIdent(format!(
            "invalid bundle ident \"{}\"",
            ident
        )));
    }

    expect(tokenizer, TextToken::Separator)?;

    let timestamp = match tokenizer.next_token()? {
        (TextToken::Literal, value) => OscTimeTag::parse(value.trim())?,
        (token, _) => {
            return Err(Error::ErrorParsingOscTimeTag(format!(
                "invalid bundle timestamp token {:?}",
                token
            )))
        }
    };

    let mut packets = Vec::new();
    let mut token = separator_or_end(tokenizer)?;

    if token == TextToken::Separator {
        token = tokenizer.next_token()?.0;

        while token != end && token != TextToken::End {
            if token != TextToken::ObjectStart {
                return Err(Error::UnexpectedToken(format!(
                    "invalid bundle token {:?}",
                    token
                )));
            }

            packets.push(read_packet(tokenizer, TextToken::ObjectEnd)?);

            token = tokenizer.next_token()?.0;
            if token == TextToken::Separator {
                token = tokenizer.next_token()?.0;
            }
        }
    }

    if token != end {
        return Err(Error::UnexpectedToken(format!("unexpected token {:?}", token)));
    }

    Ok(OscBundle::new(timestamp, packets))
}

fn expect(tokenizer: &mut Tokenizer<'_>, expected: TextToken) -> Result<()> {
    let (token, _) = tokenizer.next_token()?;
    if token != expected {
        return Err(Error::UnexpectedToken(format!(
            "unexpected token {:?}, expected {:?}",
            token, expected
        )));
    }
    Ok(())
}

fn separator_or_end(tokenizer: &mut Tokenizer<'_>) -> Result<TextToken> {
    let (token, _) = tokenizer.next_token()?;
    match token {
        TextToken::Separator | TextToken::ArrayEnd | TextToken::ObjectEnd | TextToken::End => {
            Ok(token)
        }
        _ => Err(Error::UnexpectedToken(format!(
            "unexpected token {:?}",
            token
        ))),
    }
}

// ============ Arguments ============

/// Values up to `end`; separators between values are optional
fn read_arguments(tokenizer: &mut Tokenizer<'_>, end: TextToken) -> Result<Vec<OscValue>> {
    let mut arguments = Vec::new();

    loop {
        let (token, value) = tokenizer.next_token()?;

        if token == end {
            return Ok(arguments);
        }

        match token {
            TextToken::Literal => arguments.push(parse_literal(value)?),
            TextToken::String => arguments.push(OscValue::String(unescape(value)?)),
            TextToken::Symbol => arguments.push(OscValue::Symbol(unescape(value)?)),
            TextToken::Char => arguments.push(parse_char(value)?),
            TextToken::ArrayStart => {
                arguments.push(OscValue::Array(read_arguments(tokenizer, TextToken::ArrayEnd)?))
            }
            TextToken::ObjectStart => arguments.push(read_object(tokenizer)?),
            TextToken::Separator => {}
            other => {
                return Err(Error::UnexpectedToken(format!(
                    "unexpected token {:?}",
                    other
                )))
            }
        }
    }
}

fn parse_char(value: &str) -> Result<OscValue> {
    let unescaped = unescape(value)?;
    let mut chars = unescaped.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => u8::try_from(u32::from(c))
            .map(OscValue::Char)
            .map_err(|_| Error::InvalidValue(format!("char '{}' does not fit in a byte", c))),
        _ => Err(Error::InvalidValue(format!(
            "char literal '{}' must hold exactly one character",
            value
        ))),
    }
}

/// Interpret a bare literal, trying each form in turn
pub fn parse_literal(value: &str) -> Result<OscValue> {
    let text = value.trim();

    if text.is_empty() {
        return Err(Error::InvalidValue("argument is empty".to_string()));
    }

    if let Some(hex) = text.strip_prefix("0x").filter(|hex| is_hex_digits(hex)) {
        if hex.len() <= 8 {
            if let Ok(v) = u32::from_str_radix(hex, 16) {
                return Ok(OscValue::Int(v as i32));
            }
        } else if let Ok(v) = u64::from_str_radix(hex, 16) {
            return Ok(OscValue::Long(v as i64));
        }
    }

    if let Some(number) = text.strip_suffix('L') {
        if let Ok(v) = number.parse::<i64>() {
            return Ok(OscValue::Long(v));
        }
    }

    if let Ok(v) = text.parse::<i32>() {
        return Ok(OscValue::Int(v));
    }

    if let Ok(v) = text.parse::<i64>() {
        return Ok(OscValue::Long(v));
    }

    if let Some(number) = text.strip_suffix('d').filter(|n| is_numeric(n)) {
        if let Ok(v) = number.parse::<f64>() {
            return Ok(OscValue::Double(v));
        }
    }

    if let Some(number) = text.strip_suffix('f').filter(|n| is_numeric(n)) {
        if let Ok(v) = number.parse::<f32>() {
            return Ok(OscValue::Float(v));
        }
    }

    match text {
        "Infinity" => return Ok(OscValue::Float(f32::INFINITY)),
        "-Infinity" => return Ok(OscValue::Float(f32::NEG_INFINITY)),
        "NaN" => return Ok(OscValue::Float(f32::NAN)),
        "Infinityd" => return Ok(OscValue::Double(f64::INFINITY)),
        "-Infinityd" => return Ok(OscValue::Double(f64::NEG_INFINITY)),
        "NaNd" => return Ok(OscValue::Double(f64::NAN)),
        _ => {}
    }

    if is_numeric(text) {
        if let Ok(v) = text.parse::<f32>() {
            if v.is_finite() {
                return Ok(OscValue::Float(v));
            }
        }
        if let Ok(v) = text.parse::<f64>() {
            return Ok(OscValue::Double(v));
        }
    }

    let lower = text.to_ascii_lowercase();
    match lower.as_str() {
        "true" => Ok(OscValue::Bool(true)),
        "false" => Ok(OscValue::Bool(false)),
        "null" | "nil" => Ok(OscValue::Null),
        "inf" | "infinitum" | "bang" | "impulse" => Ok(OscValue::Impulse),
        _ => Ok(OscValue::Symbol(text.to_string())),
    }
}

/// Non-empty and ASCII hex digits only; `from_str_radix` alone accepts a sign
fn is_hex_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Digits with optional sign, decimal point and exponent
fn is_numeric(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
}

// ============ Objects ============

/// `{ name: body }` after the opening brace
fn read_object(tokenizer: &mut Tokenizer<'_>) -> Result<OscValue> {
    let name = tokenizer.read_object_name()?;

    if name.is_empty() {
        return Err(Error::InvalidObjectName(
            "malformed object missing type name".to_string(),
        ));
    }

    match name.to_ascii_lowercase().as_str() {
        "midi" | "m" => {
            let parts = read_object_literals(tokenizer)?;
            OscMidiMessage::from_parts(&parts).map(OscValue::Midi)
        }
        "time" | "t" => {
            let parts = read_object_literals(tokenizer)?;
            match parts.as_slice() {
                [text] => OscTimeTag::parse(text).map(OscValue::TimeTag),
                _ => Err(Error::ErrorParsingOscTimeTag(
                    "invalid osc-timetag string".to_string(),
                )),
            }
        }
        "color" | "c" => {
            let parts = read_object_literals(tokenizer)?;
            if parts.len() != 4 {
                return Err(Error::ErrorParsingColor(format!(
                    "invalid color '{}'",
                    parts.join(",")
                )));
            }
            OscColor::from_channels(&parts).map(OscValue::Color)
        }
        "blob" | "b" | "data" | "d" => read_blob(tokenizer).map(OscValue::Blob),
        _ => Err(Error::InvalidObjectName(format!(
            "unknown object type '{}'",
            name
        ))),
    }
}

/// Comma separated literals up to the closing brace
fn read_object_literals<'a>(tokenizer: &mut Tokenizer<'a>) -> Result<Vec<&'a str>> {
    let mut parts = Vec::new();

    loop {
        match tokenizer.next_token()? {
            (TextToken::Literal, value) => parts.push(value.trim()),
            (TextToken::Separator, _) => {}
            (TextToken::ObjectEnd, _) => return Ok(parts),
            (token, _) => {
                return Err(Error::UnexpectedToken(format!(
                    "unexpected token {:?} in object",
                    token
                )))
            }
        }
    }
}

/// `64x<base64>`, `0x<hex pairs>` or a list of decimal bytes
fn read_blob(tokenizer: &mut Tokenizer<'_>) -> Result<Vec<u8>> {
    let parts = read_object_literals(tokenizer)?;

    if let [single] = parts.as_slice() {
        if let Some(encoded) = single.strip_prefix("64x") {
            return STANDARD
                .decode(encoded)
                .map_err(|e| Error::InvalidValue(format!("invalid base64 blob: {}", e)));
        }

        if let Some(hex) = single.strip_prefix("0x") {
            return parse_hex(hex);
        }
    }

    parts
        .iter()
        .map(|part| {
            part.parse::<u8>()
                .map_err(|_| Error::InvalidValue(format!("invalid blob byte '{}'", part)))
        })
        .collect()
}

fn parse_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(Error::InvalidValue("invalid blob string length".to_string()));
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .filter(|pair| is_hex_digits(pair))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| Error::InvalidValue(format!("invalid hex digits in blob at {}", i)))
        })
        .collect()
}
