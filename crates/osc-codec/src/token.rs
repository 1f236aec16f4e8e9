//! Wire tokens produced while walking a packet

/// What the reader expects next, or what a type tag character stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OscToken {
    #[default]
    None,
    OscAddress,
    TypeTag,
    Char,
    /// Either `True` or `False`
    Bool,
    True,
    False,
    String,
    Symbol,
    Impulse,
    Null,
    Int,
    Long,
    Float,
    Double,
    TimeTag,
    Blob,
    Color,
    Midi,
    ArrayStart,
    ArrayEnd,
    /// Array elements of more than one type
    MixedTypes,
    End,
    BundleMessageLength,
}

impl OscToken {
    /// Map a type tag character to its token
    pub fn from_type_tag(c: u8) -> Option<Self> {
        match c {
            b'b' => Some(OscToken::Blob),
            b's' => Some(OscToken::String),
            b'S' => Some(OscToken::Symbol),
            b'i' => Some(OscToken::Int),
            b'h' => Some(OscToken::Long),
            b'f' => Some(OscToken::Float),
            b'd' => Some(OscToken::Double),
            b't' => Some(OscToken::TimeTag),
            b'c' => Some(OscToken::Char),
            b'r' => Some(OscToken::Color),
            b'm' => Some(OscToken::Midi),
            b'T' => Some(OscToken::True),
            b'F' => Some(OscToken::False),
            b'N' => Some(OscToken::Null),
            b'I' => Some(OscToken::Impulse),
            b'[' => Some(OscToken::ArrayStart),
            b']' => Some(OscToken::ArrayEnd),
            _ => None,
        }
    }

    /// The type tag character written for this token, if it has one
    pub fn type_tag(self) -> Option<u8> {
        match self {
            OscToken::Blob => Some(b'b'),
            OscToken::String => Some(b's'),
            OscToken::Symbol => Some(b'S'),
            OscToken::Int => Some(b'i'),
            OscToken::Long => Some(b'h'),
            OscToken::Float => Some(b'f'),
            OscToken::Double => Some(b'd'),
            OscToken::TimeTag => Some(b't'),
            OscToken::Char => Some(b'c'),
            OscToken::Color => Some(b'r'),
            OscToken::Midi => Some(b'm'),
            OscToken::True => Some(b'T'),
            OscToken::False => Some(b'F'),
            OscToken::Null => Some(b'N'),
            OscToken::Impulse => Some(b'I'),
            OscToken::ArrayStart => Some(b'['),
            OscToken::ArrayEnd => Some(b']'),
            _ => None,
        }
    }

    /// Fixed payload size in bytes, `None` for variable-length tokens
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            OscToken::True | OscToken::False | OscToken::Null | OscToken::Impulse => Some(0),
            OscToken::Char | OscToken::Int | OscToken::Float | OscToken::Color | OscToken::Midi => {
                Some(4)
            }
            OscToken::Long | OscToken::Double | OscToken::TimeTag => Some(8),
            _ => None,
        }
    }
}
