//! Error types for the OSC codec

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Codec error types
///
/// Every variant carries a context string describing where the failure
/// happened. Use [`Error::code`] to branch on the kind alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer length is not a multiple of 4, or padding runs past the end
    #[error("invalid segment length: {0}")]
    InvalidSegmentLength(String),

    /// Address string is empty or unterminated
    #[error("missing address: {0}")]
    MissingAddress(String),

    /// Type tag does not start with ','
    #[error("missing comma: {0}")]
    MissingComma(String),

    /// Type tag is unterminated
    #[error("missing type tag: {0}")]
    MissingTypeTag(String),

    /// Type tag has unbalanced array brackets
    #[error("malformed type tag: {0}")]
    MalformedTypeTag(String),

    #[error("error parsing argument: {0}")]
    ErrorParsingArgument(String),

    #[error("error parsing blob: {0}")]
    ErrorParsingBlob(String),

    #[error("error parsing string: {0}")]
    ErrorParsingString(String),

    #[error("error parsing symbol: {0}")]
    ErrorParsingSymbol(String),

    #[error("error parsing int32: {0}")]
    ErrorParsingInt32(String),

    #[error("error parsing int64: {0}")]
    ErrorParsingInt64(String),

    #[error("error parsing float32: {0}")]
    ErrorParsingSingle(String),

    #[error("error parsing float64: {0}")]
    ErrorParsingDouble(String),

    #[error("error parsing color: {0}")]
    ErrorParsingColor(String),

    #[error("error parsing char: {0}")]
    ErrorParsingChar(String),

    #[error("error parsing midi message: {0}")]
    ErrorParsingMidiMessage(String),

    #[error("error parsing time tag: {0}")]
    ErrorParsingOscTimeTag(String),

    /// Type tag character outside the supported set
    #[error("unknown argument type: {0}")]
    UnknownArgumentType(String),

    /// Bundle ident is empty or unterminated
    #[error("missing bundle ident: {0}")]
    MissingBundleIdent(String),

    /// Bundle ident is not `#bundle`
    #[error("invalid bundle ident: {0}")]
    InvalidBundleIdent(String),

    /// Fewer than 4 bytes left for a bundle element length
    #[error("invalid bundle message header: {0}")]
    InvalidBundleMessageHeader(String),

    /// Packet or bundle element has no bytes
    #[error("error parsing packet: {0}")]
    ErrorParsingPacket(String),

    /// Bundle element length is negative, unaligned or overruns the bundle
    #[error("invalid bundle message length: {0}")]
    InvalidBundleMessageLength(String),

    /// Reader or text tokenizer met a token it did not expect
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    /// Writer operation called out of order
    #[error("unexpected writer state: {0}")]
    UnexpectedWriterState(String),

    #[error("error parsing address: {0}")]
    ErrorParsingOscAddress(String),

    /// Object name in the textual form is not followed by ':'
    #[error("invalid object name: {0}")]
    InvalidObjectName(String),

    /// Address or address pattern is syntactically invalid
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Value-level failure in the textual form
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl Error {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidSegmentLength(_) => ErrorCode::InvalidSegmentLength,
            Error::MissingAddress(_) => ErrorCode::MissingAddress,
            Error::MissingComma(_) => ErrorCode::MissingComma,
            Error::MissingTypeTag(_) => ErrorCode::MissingTypeTag,
            Error::MalformedTypeTag(_) => ErrorCode::MalformedTypeTag,
            Error::ErrorParsingArgument(_) => ErrorCode::ErrorParsingArgument,
            Error::ErrorParsingBlob(_) => ErrorCode::ErrorParsingBlob,
            Error::ErrorParsingString(_) => ErrorCode::ErrorParsingString,
            Error::ErrorParsingSymbol(_) => ErrorCode::ErrorParsingSymbol,
            Error::ErrorParsingInt32(_) => ErrorCode::ErrorParsingInt32,
            Error::ErrorParsingInt64(_) => ErrorCode::ErrorParsingInt64,
            Error::ErrorParsingSingle(_) => ErrorCode::ErrorParsingSingle,
            Error::ErrorParsingDouble(_) => ErrorCode::ErrorParsingDouble,
            Error::ErrorParsingColor(_) => ErrorCode::ErrorParsingColor,
            Error::ErrorParsingChar(_) => ErrorCode::ErrorParsingChar,
            Error::ErrorParsingMidiMessage(_) => ErrorCode::ErrorParsingMidiMessage,
            Error::ErrorParsingOscTimeTag(_) => ErrorCode::ErrorParsingOscTimeTag,
            Error::UnknownArgumentType(_) => ErrorCode::UnknownArgumentType,
            Error::MissingBundleIdent(_) => ErrorCode::MissingBundleIdent,
            Error::InvalidBundleIdent(_) => ErrorCode::InvalidBundleIdent,
            Error::InvalidBundleMessageHeader(_) => ErrorCode::InvalidBundleMessageHeader,
            Error::ErrorParsingPacket(_) => ErrorCode::ErrorParsingPacket,
            Error::InvalidBundleMessageLength(_) => ErrorCode::InvalidBundleMessageLength,
            Error::UnexpectedToken(_) => ErrorCode::UnexpectedToken,
            Error::UnexpectedWriterState(_) => ErrorCode::UnexpectedWriterState,
            Error::ErrorParsingOscAddress(_) => ErrorCode::ErrorParsingOscAddress,
            Error::InvalidObjectName(_) => ErrorCode::InvalidObjectName,
            Error::InvalidAddress(_) => ErrorCode::InvalidAddress,
            Error::InvalidValue(_) => ErrorCode::InvalidValue,
        }
    }
}

/// Stable numeric codes for each error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // 100-199: framing
    InvalidSegmentLength = 100,
    MissingAddress = 101,
    MissingComma = 102,
    MissingTypeTag = 103,
    MalformedTypeTag = 104,
    UnknownArgumentType = 105,
    UnexpectedToken = 106,
    UnexpectedWriterState = 107,

    // 200-299: arguments
    ErrorParsingArgument = 200,
    ErrorParsingBlob = 201,
    ErrorParsingString = 202,
    ErrorParsingSymbol = 203,
    ErrorParsingInt32 = 204,
    ErrorParsingInt64 = 205,
    ErrorParsingSingle = 206,
    ErrorParsingDouble = 207,
    ErrorParsingColor = 208,
    ErrorParsingChar = 209,
    ErrorParsingMidiMessage = 210,
    ErrorParsingOscTimeTag = 211,

    // 300-399: bundles
    MissingBundleIdent = 300,
    InvalidBundleIdent = 301,
    InvalidBundleMessageHeader = 302,
    ErrorParsingPacket = 303,
    InvalidBundleMessageLength = 304,

    // 400-499: addresses and text
    ErrorParsingOscAddress = 400,
    InvalidObjectName = 401,
    InvalidAddress = 402,
    InvalidValue = 403,
}

impl ErrorCode {
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            100 => Some(ErrorCode::InvalidSegmentLength),
            101 => Some(ErrorCode::MissingAddress),
            102 => Some(ErrorCode::MissingComma),
            103 => Some(ErrorCode::MissingTypeTag),
            104 => Some(ErrorCode::MalformedTypeTag),
            105 => Some(ErrorCode::UnknownArgumentType),
            106 => Some(ErrorCode::UnexpectedToken),
            107 => Some(ErrorCode::UnexpectedWriterState),
            200 => Some(ErrorCode::ErrorParsingArgument),
            201 => Some(ErrorCode::ErrorParsingBlob),
            202 => Some(ErrorCode::ErrorParsingString),
            203 => Some(ErrorCode::ErrorParsingSymbol),
            204 => Some(ErrorCode::ErrorParsingInt32),
            205 => Some(ErrorCode::ErrorParsingInt64),
            206 => Some(ErrorCode::ErrorParsingSingle),
            207 => Some(ErrorCode::ErrorParsingDouble),
            208 => Some(ErrorCode::ErrorParsingColor),
            209 => Some(ErrorCode::ErrorParsingChar),
            210 => Some(ErrorCode::ErrorParsingMidiMessage),
            211 => Some(ErrorCode::ErrorParsingOscTimeTag),
            300 => Some(ErrorCode::MissingBundleIdent),
            301 => Some(ErrorCode::InvalidBundleIdent),
            302 => Some(ErrorCode::InvalidBundleMessageHeader),
            303 => Some(ErrorCode::ErrorParsingPacket),
            304 => Some(ErrorCode::InvalidBundleMessageLength),
            400 => Some(ErrorCode::ErrorParsingOscAddress),
            401 => Some(ErrorCode::InvalidObjectName),
            402 => Some(ErrorCode::InvalidAddress),
            403 => Some(ErrorCode::InvalidValue),
            _ => None,
        }
    }
}
