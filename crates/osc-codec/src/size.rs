//! Wire size calculation
//!
//! Every function here must agree byte for byte with what
//! [`OscWriter`](crate::OscWriter) produces.

use crate::OscValue;

/// Zero bytes needed after `len` bytes to reach a 4-byte boundary
#[inline]
pub const fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// `len` rounded up to a multiple of 4
#[inline]
pub const fn padded(len: usize) -> usize {
    len + padding(len)
}

/// String or symbol: UTF-8 bytes plus terminator, padded
#[inline]
pub fn string_size(s: &str) -> usize {
    padded(s.len() + 1)
}

/// Blob: length prefix plus bytes, padded
#[inline]
pub fn blob_size(b: &[u8]) -> usize {
    4 + padded(b.len())
}

/// Type tag characters for `args`, with array brackets counted
pub fn type_tag_len(args: &[OscValue]) -> usize {
    args.iter().map(OscValue::type_tag_len).sum()
}

/// Bytes of the argument section
pub fn arguments_size(args: &[OscValue]) -> usize {
    args.iter().map(OscValue::size_in_bytes).sum()
}

/// Full message size: address, type tag and arguments
pub fn message_size(address: &str, args: &[OscValue]) -> usize {
    if address.is_empty() {
        return 0;
    }

    let size = padded(address.len() + 1);

    if args.is_empty() {
        // ",\0\0\0"
        return size + 4;
    }

    // comma + tags + terminator
    size + padded(1 + type_tag_len(args) + 1) + arguments_size(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(padding(0), 0);
        assert_eq!(padding(1), 3);
        assert_eq!(padding(3), 1);
        assert_eq!(padding(4), 0);
        assert_eq!(padded(5), 8);
    }

    #[test]
    fn test_message_size() {
        assert_eq!(message_size("/test", &[]), 12);
        assert_eq!(message_size("/test", &[OscValue::Int(42)]), 16);
        assert_eq!(message_size("/abc", &[OscValue::Int(42)]), 16);
        let three = [OscValue::Float(1.0), OscValue::Float(2.0), OscValue::Float(3.0)];
        assert_eq!(message_size("/test", &three), 8 + 8 + 12);
    }
}
