//! A non-blocking byte tokenizer for strict JSON.
//!
//! [`ByteTokenizer`] buffers whatever it is fed and turns it into [`Token`]s
//! on demand. When the buffered bytes cannot finish the next token it returns
//! [`Token::NotAvailable`] and keeps the partial token in its own state: a
//! keyword half matched, number text, string bytes, the digits of a `\u`
//! escape, a high surrogate waiting for its low half, or the leading bytes of
//! a UTF-8 sequence.
//!
//! The tokenizer tracks the JSON grammar itself, so it only produces token
//! sequences that form well-bracketed documents. Several top-level values may
//! follow one another.
//!
//! # Examples
//!
//! ```rust
//! use jsonfeed::{ByteTokenizer, Token, Tokenizer};
//!
//! let mut tokenizer = ByteTokenizer::new();
//! tokenizer.feed(br#"{"a": tr"#);
//! assert_eq!(tokenizer.next_token().unwrap(), Token::StartObject);
//! assert_eq!(tokenizer.next_token().unwrap(), Token::FieldName("a".into()));
//! assert_eq!(tokenizer.next_token().unwrap(), Token::NotAvailable);
//!
//! tokenizer.feed(b"ue}");
//! assert_eq!(tokenizer.next_token().unwrap(), Token::True);
//! assert_eq!(tokenizer.next_token().unwrap(), Token::EndObject);
//! ```
#![allow(clippy::struct_field_names)]
#![allow(clippy::unnecessary_wraps)]

mod byte_buffer;
mod escape_buffer;
mod keyword;


use std::mem;

use bstr::{BString, ByteSlice};

use self::{
    byte_buffer::ByteBuffer,
    escape_buffer::UnicodeEscapeBuffer,
    keyword::{KeywordMatcher, Progress},
};
use crate::{
    error::{LexError, SyntaxError},
    options::ParserOptions,
    token::{Token, Tokenizer},
};

/// Where in the grammar the next token is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Between top-level values.
    Start,
    /// After `{` (`first`) or after a `,` inside an object.
    BeforePropertyName { first: bool },
    AfterPropertyName,
    BeforePropertyValue,
    /// After `[` (`first`) or after a `,` inside an array.
    BeforeArrayValue { first: bool },
    AfterPropertyValue,
    AfterArrayValue,
}

/// Progress through the token currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Keyword,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
    String,
    StringEscape,
    StringEscapeUnicode,
    /// A high surrogate was decoded; its `\` must follow.
    SurrogateBackslash(u16),
    /// A high surrogate and `\` were read; the `u` must follow.
    SurrogateU(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringKind {
    FieldName,
    Value,
}

/// The default [`Tokenizer`]: strict RFC 8259 JSON over raw bytes.
#[derive(Debug)]
pub struct ByteTokenizer {
    source: ByteBuffer,
    offset: usize,
    line: usize,
    column: usize,

    parse_state: ParseState,
    lex_state: LexState,
    containers: Vec<Container>,

    /// Text of the number or string being read. Empty between tokens.
    scratch: Vec<u8>,
    /// Length of the prefix of `scratch` known to be valid UTF-8.
    utf8_valid: usize,
    string_kind: StringKind,
    escape: UnicodeEscapeBuffer,
    high_surrogate: Option<u16>,
    keyword: Option<KeywordMatcher>,

    max_string_len: Option<usize>,
    error: Option<LexError>,
}

impl Default for ByteTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteTokenizer {
    /// Creates a tokenizer without limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&ParserOptions::default())
    }

    /// Creates a tokenizer honoring the string limit in `options`.
    #[must_use]
    pub fn with_options(options: &ParserOptions) -> Self {
        Self {
            source: ByteBuffer::new(),
            offset: 0,
            line: 1,
            column: 1,
            parse_state: ParseState::Start,
            lex_state: LexState::Default,
            containers: Vec::new(),
            scratch: Vec::new(),
            utf8_valid: 0,
            string_kind: StringKind::Value,
            escape: UnicodeEscapeBuffer::new(),
            high_surrogate: None,
            keyword: None,
            max_string_len: options.max_string_len,
            error: None,
        }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// One-based line of the next unread byte.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column, in characters, of the next unread byte.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    fn step(&mut self) -> Result<Option<Token>, SyntaxError> {
        let Some(byte) = self.source.peek() else {
            return Ok(Some(Token::NotAvailable));
        };

        match self.lex_state {
            LexState::Default => match byte {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.advance();
                    Ok(None)
                }
                _ => self.step_structure(byte),
            },

            LexState::Keyword => match self.keyword.as_mut().map(|m| m.feed(byte)) {
                Some(Progress::Partial) => {
                    self.advance();
                    Ok(None)
                }
                Some(Progress::Complete(token)) => {
                    self.advance();
                    self.keyword = None;
                    self.end_value();
                    Ok(Some(token))
                }
                Some(Progress::Mismatch) | None => Err(unexpected(byte)),
            },

            LexState::Sign => match byte {
                b'0' => self.push_number_byte(byte, LexState::Zero),
                b'1'..=b'9' => self.copy_digits(LexState::DecimalInteger),
                _ => Err(unexpected(byte)),
            },

            LexState::Zero => match byte {
                b'.' => self.push_number_byte(byte, LexState::DecimalPoint),
                b'e' | b'E' => self.push_number_byte(byte, LexState::DecimalExponent),
                _ => self.produce_number().map(Some),
            },

            LexState::DecimalInteger => match byte {
                b'0'..=b'9' => self.copy_digits(LexState::DecimalInteger),
                b'.' => self.push_number_byte(byte, LexState::DecimalPoint),
                b'e' | b'E' => self.push_number_byte(byte, LexState::DecimalExponent),
                _ => self.produce_number().map(Some),
            },

            LexState::DecimalPoint => match byte {
                b'0'..=b'9' => self.copy_digits(LexState::DecimalFraction),
                _ => Err(unexpected(byte)),
            },

            LexState::DecimalFraction => match byte {
                b'0'..=b'9' => self.copy_digits(LexState::DecimalFraction),
                b'e' | b'E' => self.push_number_byte(byte, LexState::DecimalExponent),
                _ => self.produce_number().map(Some),
            },

            LexState::DecimalExponent => match byte {
                b'+' | b'-' => self.push_number_byte(byte, LexState::DecimalExponentSign),
                b'0'..=b'9' => self.copy_digits(LexState::DecimalExponentInteger),
                _ => Err(unexpected(byte)),
            },

            LexState::DecimalExponentSign => match byte {
                b'0'..=b'9' => self.copy_digits(LexState::DecimalExponentInteger),
                _ => Err(unexpected(byte)),
            },

            LexState::DecimalExponentInteger => match byte {
                b'0'..=b'9' => self.copy_digits(LexState::DecimalExponentInteger),
                _ => self.produce_number().map(Some),
            },

            LexState::String => match byte {
                b'"' => self.produce_string().map(Some),
                b'\\' => {
                    self.advance();
                    self.lex_state = LexState::StringEscape;
                    Ok(None)
                }
                0x00..=0x1F => Err(unexpected(byte)),
                _ => {
                    self.copy_string_run()?;
                    Ok(None)
                }
            },

            LexState::StringEscape => {
                let decoded = match byte {
                    b'"' | b'\\' | b'/' => byte,
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'u' => {
                        self.advance();
                        self.escape.reset();
                        self.lex_state = LexState::StringEscapeUnicode;
                        return Ok(None);
                    }
                    _ => return Err(unexpected(byte)),
                };
                self.advance();
                self.scratch.push(decoded);
                self.lex_state = LexState::String;
                self.check_string()?;
                Ok(None)
            }

            LexState::StringEscapeUnicode => {
                let unit = self.escape.feed(byte)?;
                self.advance();
                if let Some(unit) = unit {
                    self.push_code_unit(unit)?;
                }
                Ok(None)
            }

            LexState::SurrogateBackslash(high) => {
                if byte != b'\\' {
                    return Err(SyntaxError::UnpairedSurrogate(high));
                }
                self.advance();
                self.lex_state = LexState::SurrogateU(high);
                Ok(None)
            }

            LexState::SurrogateU(high) => {
                if byte != b'u' {
                    return Err(SyntaxError::UnpairedSurrogate(high));
                }
                self.advance();
                self.high_surrogate = Some(high);
                self.escape.reset();
                self.lex_state = LexState::StringEscapeUnicode;
                Ok(None)
            }
        }
    }

    /// Handles a non-whitespace byte between tokens.
    fn step_structure(&mut self, byte: u8) -> Result<Option<Token>, SyntaxError> {
        match self.parse_state {
            ParseState::BeforeArrayValue { first: true } if byte == b']' => {
                Ok(Some(self.close(Container::Array)))
            }
            ParseState::Start | ParseState::BeforePropertyValue | ParseState::BeforeArrayValue { .. } => {
                self.begin_value(byte)
            }

            ParseState::BeforePropertyName { first } => match byte {
                b'"' => {
                    self.advance();
                    self.begin_string(StringKind::FieldName);
                    Ok(None)
                }
                b'}' if first => Ok(Some(self.close(Container::Object))),
                _ => Err(unexpected(byte)),
            },

            ParseState::AfterPropertyName => match byte {
                b':' => {
                    self.advance();
                    self.parse_state = ParseState::BeforePropertyValue;
                    Ok(None)
                }
                _ => Err(unexpected(byte)),
            },

            ParseState::AfterPropertyValue => match byte {
                b',' => {
                    self.advance();
                    self.parse_state = ParseState::BeforePropertyName { first: false };
                    Ok(None)
                }
                b'}' => Ok(Some(self.close(Container::Object))),
                _ => Err(unexpected(byte)),
            },

            ParseState::AfterArrayValue => match byte {
                b',' => {
                    self.advance();
                    self.parse_state = ParseState::BeforeArrayValue { first: false };
                    Ok(None)
                }
                b']' => Ok(Some(self.close(Container::Array))),
                _ => Err(unexpected(byte)),
            },
        }
    }

    fn begin_value(&mut self, byte: u8) -> Result<Option<Token>, SyntaxError> {
        match byte {
            b'{' => {
                self.advance();
                self.containers.push(Container::Object);
                self.parse_state = ParseState::BeforePropertyName { first: true };
                Ok(Some(Token::StartObject))
            }
            b'[' => {
                self.advance();
                self.containers.push(Container::Array);
                self.parse_state = ParseState::BeforeArrayValue { first: true };
                Ok(Some(Token::StartArray))
            }
            b'"' => {
                self.advance();
                self.begin_string(StringKind::Value);
                Ok(None)
            }
            b'n' | b't' | b'f' => {
                self.advance();
                self.keyword = KeywordMatcher::after(byte);
                self.lex_state = LexState::Keyword;
                Ok(None)
            }
            b'-' => self.push_number_byte(byte, LexState::Sign),
            b'0' => self.push_number_byte(byte, LexState::Zero),
            b'1'..=b'9' => self.copy_digits(LexState::DecimalInteger),
            _ => Err(unexpected(byte)),
        }
    }

    /// Consumes a closing bracket. The grammar state guarantees it matches.
    fn close(&mut self, container: Container) -> Token {
        self.advance();
        let closed = self.containers.pop();
        debug_assert_eq!(closed, Some(container));
        self.end_value();
        match container {
            Container::Object => Token::EndObject,
            Container::Array => Token::EndArray,
        }
    }

    /// A complete value was read; expect whatever follows it.
    fn end_value(&mut self) {
        self.lex_state = LexState::Default;
        self.parse_state = match self.containers.last() {
            None => ParseState::Start,
            Some(Container::Object) => ParseState::AfterPropertyValue,
            Some(Container::Array) => ParseState::AfterArrayValue,
        };
    }

    // -- numbers ----------------------------------------------------------------------------------

    fn push_number_byte(&mut self, byte: u8, next: LexState) -> Result<Option<Token>, SyntaxError> {
        self.advance();
        self.scratch.push(byte);
        self.lex_state = next;
        Ok(None)
    }

    fn copy_digits(&mut self, next: LexState) -> Result<Option<Token>, SyntaxError> {
        let copied = self.source.copy_while(&mut self.scratch, |b| b.is_ascii_digit());
        self.offset += copied;
        self.column += copied;
        self.lex_state = next;
        Ok(None)
    }

    /// Converts the finished number text. The delimiting byte is not consumed.
    fn produce_number(&mut self) -> Result<Token, SyntaxError> {
        let is_float = self.scratch.iter().any(|b| matches!(b, b'.' | b'e' | b'E'));
        let token = {
            let text = self.scratch.to_str_lossy();
            let out_of_range = || SyntaxError::NumberOutOfRange(text.to_string());
            if is_float {
                match text.parse::<f64>() {
                    Ok(n) if n.is_finite() => Token::Float(n),
                    _ => return Err(out_of_range()),
                }
            } else {
                Token::Integer(text.parse::<i64>().map_err(|_| out_of_range())?)
            }
        };
        self.scratch.clear();
        self.end_value();
        Ok(token)
    }

    // -- strings ----------------------------------------------------------------------------------

    fn begin_string(&mut self, kind: StringKind) {
        self.string_kind = kind;
        self.utf8_valid = 0;
        self.high_surrogate = None;
        self.lex_state = LexState::String;
    }

    /// Copies a run of plain string bytes straight out of the ring.
    fn copy_string_run(&mut self) -> Result<(), SyntaxError> {
        let start = self.scratch.len();
        let copied = self
            .source
            .copy_while(&mut self.scratch, |b| b >= 0x20 && b != b'"' && b != b'\\');
        self.offset += copied;
        self.column += self.scratch[start..]
            .iter()
            .filter(|&&b| !is_continuation(b))
            .count();
        self.check_string()
    }

    fn push_code_unit(&mut self, unit: u16) -> Result<(), SyntaxError> {
        let scalar = match (self.high_surrogate.take(), unit) {
            (None, 0xD800..=0xDBFF) => {
                self.lex_state = LexState::SurrogateBackslash(unit);
                return Ok(());
            }
            (None, 0xDC00..=0xDFFF) => return Err(SyntaxError::UnpairedSurrogate(unit)),
            (None, _) => u32::from(unit),
            (Some(high), 0xDC00..=0xDFFF) => {
                0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00)
            }
            (Some(high), _) => return Err(SyntaxError::UnpairedSurrogate(high)),
        };
        let ch = char::from_u32(scalar).ok_or(SyntaxError::UnpairedSurrogate(unit))?;

        let mut encoded = [0; 4];
        self.scratch
            .extend_from_slice(ch.encode_utf8(&mut encoded).as_bytes());
        self.lex_state = LexState::String;
        self.check_string()
    }

    /// Validates bytes appended since the last check and enforces the length
    /// limit. A sequence cut off at the end of `scratch` stays pending.
    fn check_string(&mut self) -> Result<(), SyntaxError> {
        if let Some(max) = self.max_string_len {
            if self.scratch.len() > max {
                return Err(SyntaxError::StringTooLong(max));
            }
        }

        match std::str::from_utf8(&self.scratch[self.utf8_valid..]) {
            Ok(_) => self.utf8_valid = self.scratch.len(),
            Err(err) => {
                let start = self.utf8_valid + err.valid_up_to();
                match err.error_len() {
                    None => self.utf8_valid = start,
                    Some(len) => {
                        return Err(SyntaxError::InvalidUtf8(BString::from(
                            &self.scratch[start..start + len],
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn produce_string(&mut self) -> Result<Token, SyntaxError> {
        if self.utf8_valid != self.scratch.len() {
            return Err(SyntaxError::InvalidUtf8(BString::from(
                &self.scratch[self.utf8_valid..],
            )));
        }
        self.advance();

        let bytes = mem::take(&mut self.scratch);
        self.utf8_valid = 0;
        let text = String::from_utf8(bytes)
            .map_err(|err| SyntaxError::InvalidUtf8(BString::from(err.into_bytes())))?;

        Ok(match self.string_kind {
            StringKind::FieldName => {
                self.lex_state = LexState::Default;
                self.parse_state = ParseState::AfterPropertyName;
                Token::FieldName(text)
            }
            StringKind::Value => {
                self.end_value();
                Token::String(text)
            }
        })
    }

    // -- input ------------------------------------------------------------------------------------

    fn advance(&mut self) {
        if let Some(byte) = self.source.next() {
            self.offset += 1;
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if !is_continuation(byte) {
                self.column += 1;
            }
        }
    }
}

impl Tokenizer for ByteTokenizer {
    fn needs_input(&self) -> bool {
        self.source.is_empty()
    }

    fn feed(&mut self, bytes: &[u8]) {
        self.source.push(bytes);
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        loop {
            match self.step() {
                Ok(None) => {}
                Ok(Some(token)) => return Ok(token),
                Err(kind) => {
                    let err = LexError {
                        kind,
                        line: self.line,
                        column: self.column,
                    };
                    self.error = Some(err.clone());
                    return Err(err);
                }
            }
        }
    }

    fn is_between_values(&self) -> bool {
        self.error.is_none()
            && self.parse_state == ParseState::Start
            && self.lex_state == LexState::Default
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

fn unexpected(byte: u8) -> SyntaxError {
    if byte.is_ascii() {
        SyntaxError::InvalidCharacter(char::from(byte))
    } else {
        SyntaxError::InvalidByte(byte)
    }
}
