//! Lexical tokens and the tokenizer interface the parser is driven by.

use crate::error::LexError;

/// A minimal lexical unit of JSON, as produced by a [`Tokenizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// The buffered input cannot resolve the next token; feed more bytes.
    NotAvailable,
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// The name of an object member, escapes decoded.
    FieldName(String),
    /// A string value, escapes decoded.
    String(String),
    /// A number written without fraction or exponent.
    Integer(i64),
    /// A number written with a fraction or an exponent.
    Float(f64),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

impl Token {
    /// Stable name of the token kind, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Token::NotAvailable => "NOT_AVAILABLE",
            Token::StartObject => "START_OBJECT",
            Token::EndObject => "END_OBJECT",
            Token::StartArray => "START_ARRAY",
            Token::EndArray => "END_ARRAY",
            Token::FieldName(_) => "FIELD_NAME",
            Token::String(_) => "VALUE_STRING",
            Token::Integer(_) => "VALUE_NUMBER_INT",
            Token::Float(_) => "VALUE_NUMBER_FLOAT",
            Token::True => "VALUE_TRUE",
            Token::False => "VALUE_FALSE",
            Token::Null => "VALUE_NULL",
        }
    }

    /// Returns `true` for [`Token::NotAvailable`].
    #[must_use]
    pub fn is_not_available(&self) -> bool {
        matches!(self, Self::NotAvailable)
    }
}

/// A non-blocking JSON tokenizer.
///
/// Implementations buffer whatever they are fed and hand out tokens until the
/// buffered bytes run out, at which point [`next_token`](Self::next_token)
/// returns [`Token::NotAvailable`]. Feeding more bytes afterwards resumes
/// wherever the previous input stopped, including in the middle of a string,
/// a number, an escape sequence or a UTF-8 code point.
pub trait Tokenizer {
    /// Returns `true` once every previously fed byte has been consumed.
    fn needs_input(&self) -> bool;

    /// Appends `bytes` to the input.
    fn feed(&mut self, bytes: &[u8]);

    /// Pulls the next token out of the buffered input.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] on malformed input. A tokenizer that failed once
    /// keeps failing.
    fn next_token(&mut self) -> Result<Token, LexError>;

    /// Returns `true` when no token and no container is partially read, i.e.
    /// the input so far ends cleanly between top-level values.
    fn is_between_values(&self) -> bool;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &mut T {
    fn needs_input(&self) -> bool {
        (**self).needs_input()
    }

    fn feed(&mut self, bytes: &[u8]) {
        (**self).feed(bytes);
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        (**self).next_token()
    }

    fn is_between_values(&self) -> bool {
        (**self).is_between_values()
    }
}
