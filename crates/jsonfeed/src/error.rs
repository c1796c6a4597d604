use bstr::BString;
use thiserror::Error;

/// Everything `AsyncJsonParser::consume` can fail with.
///
/// Any error is terminal for the parser instance that produced it; a fresh
/// parser is required to read another stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    /// The tokenizer rejected the byte stream.
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),
    /// The token stream does not describe a tree the builder can hold.
    #[error("malformed input: {0}")]
    Structural(#[from] StructuralError),
    /// `consume_len` was asked for more bytes than the buffer holds.
    #[error("length {length} exceeds buffer of {available} bytes")]
    LengthOutOfBounds {
        /// Requested number of bytes.
        length: usize,
        /// Size of the buffer that was passed in.
        available: usize,
    },
    /// The tokenizer still holds bytes from an earlier call.
    #[error("tokenizer has unread input from a previous call")]
    PendingInput,
    /// The stream ended inside a document or a token.
    #[error("input ended inside an incomplete document")]
    Incomplete,
    /// A previous call failed; the parser state is no longer meaningful.
    #[error("parser failed previously and cannot be reused")]
    Poisoned,
}

/// A lexical error together with the position it was detected at.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at {line}:{column}")]
pub struct LexError {
    /// What went wrong.
    pub kind: SyntaxError,
    /// 1-based line of the offending input.
    pub line: usize,
    /// 1-based column (in characters) of the offending input.
    pub column: usize,
}

/// Lexical failures raised by the byte tokenizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// An ASCII character that is not valid at this position.
    #[error("invalid character '{}'", .0.escape_debug())]
    InvalidCharacter(char),
    /// A non-ASCII byte outside of a string.
    #[error("invalid byte 0x{0:02X}")]
    InvalidByte(u8),
    /// A string contains a malformed or truncated UTF-8 sequence.
    #[error("invalid UTF-8 sequence {0:?} in string")]
    InvalidUtf8(BString),
    /// A `\u` escape contains something other than a hex digit.
    #[error("invalid unicode escape character '{}'", .0.escape_debug())]
    InvalidUnicodeEscape(char),
    /// A UTF-16 surrogate escape without its other half.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
    /// The number does not fit the type its syntax calls for.
    #[error("number out of range: {0}")]
    NumberOutOfRange(String),
    /// A string or field name is longer than the configured limit.
    #[error("string exceeds the limit of {0} bytes")]
    StringTooLong(usize),
}

/// Violations of the container-stack invariants of the tree builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    /// A token that needs an open container arrived while none was open.
    #[error("{0} token with no open container")]
    EmptyStack(&'static str),
    /// A token the builder has no rule for.
    #[error("unrecognized token: {0}")]
    UnrecognizedToken(&'static str),
    /// A value arrived inside an object without a preceding field name.
    #[error("object member without a field name")]
    MissingFieldName,
    /// A field name outside an object, or a second name before the value of
    /// the first.
    #[error("unexpected field name {0:?}")]
    UnexpectedFieldName(String),
    /// An end token does not match the innermost open container.
    #[error("{0} token does not match the open container")]
    MismatchedEnd(&'static str),
    /// Containers are nested deeper than `ParserOptions::max_depth`.
    #[error("nesting depth exceeds the limit of {0}")]
    DepthLimitExceeded(usize),
}
