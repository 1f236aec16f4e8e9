//! 32-bit RGBA color argument (`r`)

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An RGBA color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OscColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl OscColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack from the wire layout `R<<24 | G<<16 | B<<8 | A`
    #[inline]
    pub const fn from_rgba(value: u32) -> Self {
        Self {
            r: (value >> 24) as u8,
            g: (value >> 16) as u8,
            b: (value >> 8) as u8,
            a: value as u8,
        }
    }

    /// Pack into the wire layout
    #[inline]
    pub const fn to_rgba(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    /// Parse `r, g, b, a`
    pub fn parse(s: &str) -> Result<Self> {
        let pieces: Vec<&str> = s.split(',').collect();
        if pieces.len() != 4 {
            return Err(Error::ErrorParsingColor(format!("invalid color '{}'", s)));
        }
        Self::from_channels(&pieces)
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    pub(crate) fn from_channels(pieces: &[&str]) -> Result<Self> {
        let channel = |name: &str, text: &str| -> Result<u8> {
            text.trim().parse::<u8>().map_err(|_| {
                Error::ErrorParsingColor(format!(
                    "the {} channel has a value of '{}', channel values must be in the range 0 to 255",
                    name,
                    text.trim()
                ))
            })
        };

        Ok(Self {
            r: channel("red", pieces[0])?,
            g: channel("green", pieces[1])?,
            b: channel("blue", pieces[2])?,
            a: channel("alpha", pieces[3])?,
        })
    }
}

impl fmt::Display for OscColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, {}", self.r, self.g, self.b, self.a)
    }
}
