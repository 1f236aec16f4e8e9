//! Backslash escaping for quoted strings, symbols and chars

use crate::{Error, Result};

/// Escape control characters, quotes, backslashes and U+007F..=U+00FF
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c < ' ' || ('\u{7F}'..='\u{FF}').contains(&c) => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }

    out
}

/// Whether every escape sequence in `s` is well formed
pub fn is_valid_escape(s: &str) -> bool {
    unescape(s).is_ok()
}

/// Reverse of [`escape`]; `\xHH` yields the character U+00HH
pub fn unescape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices();

    while let Some((index, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let (_, code) = chars.next().ok_or_else(|| {
            Error::InvalidValue(format!("invalid escape sequence at char {}", index))
        })?;

        let unescaped = match code.to_ascii_lowercase() {
            '0' => '\0',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            'x' => {
                let high = hex_digit(chars.next(), s.len())?;
                let low = hex_digit(chars.next(), s.len())?;
                char::from((high << 4) | low)
            }
            _ => {
                return Err(Error::InvalidValue(format!(
                    "invalid escape sequence at char {}",
                    index
                )))
            }
        };

        out.push(unescaped);
    }

    Ok(out)
}

fn hex_digit(next: Option<(usize, char)>, len: usize) -> Result<u8> {
    match next {
        Some((index, c)) => c.to_digit(16).map(|d| d as u8).ok_or_else(|| {
            Error::InvalidValue(format!(
                "invalid escape sequence at char {}, \"{}\" is not a valid hex digit",
                index, c
            ))
        }),
        None => Err(Error::InvalidValue(format!(
            "invalid escape sequence at char {}, missing hex value",
            len.saturating_sub(1)
        ))),
    }
}
