//! Cursor over a message type tag

use crate::{Error, OscToken, Result};

/// A cursor over the characters of a type tag (without the leading ',')
///
/// Yields one [`OscToken`] per character and [`OscToken::End`] once the
/// index reaches the end of the tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeTag<'a> {
    tag: &'a [u8],
    index: usize,
}

impl<'a> TypeTag<'a> {
    pub fn new(tag: &'a [u8]) -> Self {
        Self { tag, index: 0 }
    }

    /// Index of the current character
    pub fn index(&self) -> usize {
        self.index
    }

    /// The underlying type tag text
    pub fn as_bytes(&self) -> &'a [u8] {
        self.tag
    }

    /// Token at the current index
    pub fn current(&self) -> Result<OscToken> {
        self.token_at(self.index)
    }

    /// Advance and return the new current token
    pub fn advance(&mut self) -> Result<OscToken> {
        self.index += 1;
        self.token_at(self.index)
    }

    /// Number of top-level arguments, and their shared type
    pub fn argument_count(&self) -> Result<(usize, OscToken)> {
        self.array_length(0)
    }

    /// Number of elements of the array starting at the current index
    pub fn array_element_count(&self) -> Result<(usize, OscToken)> {
        self.array_length(self.index + 1)
    }

    fn token_at(&self, index: usize) -> Result<OscToken> {
        if index == self.tag.len() {
            return Ok(OscToken::End);
        }

        let c = *self.tag.get(index).ok_or_else(|| {
            Error::UnexpectedToken(format!("index {} is past the end of the type tag", index))
        })?;

        OscToken::from_type_tag(c).ok_or_else(|| {
            Error::UnknownArgumentType(format!(
                "unknown OSC type '{}' on argument {}",
                c as char, index
            ))
        })
    }

    /// Count elements until the matching `]` or the end of the tag. Only
    /// elements at depth zero are counted; nested arrays count as one.
    fn array_length(&self, mut index: usize) -> Result<(usize, OscToken)> {
        let mut array_type = OscToken::None;

        if index == self.tag.len() {
            return Ok((0, array_type));
        }

        let mut count = 0;
        let mut inset: i32 = 0;

        loop {
            let token = self.token_at(index)?;
            index += 1;

            match token {
                OscToken::True | OscToken::False => {
                    if array_type == OscToken::None {
                        array_type = OscToken::Bool;
                    } else if array_type != OscToken::Bool {
                        array_type = OscToken::MixedTypes;
                    }
                    if inset == 0 {
                        count += 1;
                    }
                }
                OscToken::Null => {
                    if array_type != OscToken::String && array_type != OscToken::Blob {
                        array_type = OscToken::MixedTypes;
                    }
                    if inset == 0 {
                        count += 1;
                    }
                }
                OscToken::ArrayStart => {
                    if inset == 0 {
                        count += 1;
                    }
                    inset += 1;
                }
                OscToken::ArrayEnd => {
                    inset -= 1;
                    if inset == -1 {
                        return Ok((count, array_type));
                    }
                }
                OscToken::End => return Ok((count, array_type)),
                other => {
                    if array_type == OscToken::None {
                        array_type = other;
                    } else if array_type != other {
                        array_type = OscToken::MixedTypes;
                    }
                    if inset == 0 {
                        count += 1;
                    }
                }
            }
        }
    }
}
