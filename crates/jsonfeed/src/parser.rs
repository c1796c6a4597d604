//! The push-based document parser.
//!
//! [`AsyncJsonParser`] accepts byte chunks of any size through
//! [`consume`](AsyncJsonParser::consume) and calls its completion callback
//! once for every top-level JSON value that the cumulative input completes.
//! Chunk boundaries are irrelevant: they may fall inside a string, a number,
//! an escape sequence or a UTF-8 code point.
//!
//! # Examples
//!
//! ```rust
//! use jsonfeed::{AsyncJsonParser, ParserState, Value};
//!
//! let mut documents = Vec::new();
//! let mut parser = AsyncJsonParser::new(|doc: Value| documents.push(doc));
//!
//! assert_eq!(parser.consume(br#"{"id": 1, "tags": ["a", "#).unwrap(), 0);
//! assert_eq!(parser.state(), ParserState::Suspended { depth: 2 });
//!
//! assert_eq!(parser.consume(br#""b"]}{"id": 2}"#).unwrap(), 2);
//! assert_eq!(parser.finish().unwrap(), 2);
//!
//! assert_eq!(documents[0].to_string(), r#"{"id":1,"tags":["a","b"]}"#);
//! assert_eq!(documents[1].get("id"), Some(&Value::Integer(2)));
//! ```

use tracing::{debug, trace};

use crate::{
    error::ParserError,
    options::ParserOptions,
    token::Tokenizer,
    tokenizer::ByteTokenizer,
    tree_builder::TreeBuilder,
    value::Value,
};

/// Where a parser stands between two calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Every byte so far belongs to completed documents.
    Idle,
    /// Inside a document (or a partially read token) and waiting for bytes.
    Suspended {
        /// Number of open objects and arrays.
        depth: usize,
    },
    /// A call failed; the parser only reports [`ParserError::Poisoned`] now.
    Failed,
}

/// Incremental JSON parser that emits one [`Value`] per completed top-level
/// document.
///
/// The parser owns a [`Tokenizer`] (a [`ByteTokenizer`] unless another one is
/// supplied) and a tree builder whose state persists across calls. The
/// completion callback runs synchronously inside
/// [`consume`](Self::consume), before the next token is read.
///
/// Only objects and arrays can be top-level documents. The first error of any
/// kind is terminal: from then on every call returns
/// [`ParserError::Poisoned`].
pub struct AsyncJsonParser<F, T = ByteTokenizer>
where
    F: FnMut(Value),
    T: Tokenizer,
{
    tokenizer: T,
    builder: TreeBuilder,
    on_document: F,
    documents: usize,
    failed: bool,

    #[cfg(any(test, feature = "fuzzing"))]
    panic_on_error: bool,
}

impl<F> AsyncJsonParser<F>
where
    F: FnMut(Value),
{
    /// Creates a parser with the default tokenizer and no limits.
    pub fn new(on_document: F) -> Self {
        Self::with_options(ParserOptions::default(), on_document)
    }

    /// Creates a parser with the default tokenizer configured by `options`.
    pub fn with_options(options: ParserOptions, on_document: F) -> Self {
        Self::with_factory(ByteTokenizer::with_options, options, on_document)
    }
}

impl<F, T> AsyncJsonParser<F, T>
where
    F: FnMut(Value),
    T: Tokenizer,
{
    /// Creates a parser around an existing tokenizer.
    ///
    /// `options.max_string_len` is a tokenizer setting and has no effect
    /// here; configure `tokenizer` directly.
    pub fn with_tokenizer(tokenizer: T, options: ParserOptions, on_document: F) -> Self {
        Self {
            tokenizer,
            builder: TreeBuilder::new(options.max_depth),
            on_document,
            documents: 0,
            failed: false,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: options.panic_on_error,
        }
    }

    /// Creates a parser whose tokenizer is built by `factory` from `options`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonfeed::{AsyncJsonParser, ByteTokenizer, ParserOptions};
    ///
    /// let mut parser = AsyncJsonParser::with_factory(
    ///     |options: &ParserOptions| ByteTokenizer::with_options(options),
    ///     ParserOptions::default(),
    ///     |_doc| {},
    /// );
    /// assert_eq!(parser.consume(b"[]").unwrap(), 1);
    /// ```
    pub fn with_factory<G>(factory: G, options: ParserOptions, on_document: F) -> Self
    where
        G: FnOnce(&ParserOptions) -> T,
    {
        let tokenizer = factory(&options);
        Self::with_tokenizer(tokenizer, options, on_document)
    }

    /// Feeds `bytes` and emits every document they complete.
    ///
    /// Returns the number of documents completed during this call. An empty
    /// slice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`ParserError::Lexical`] if the tokenizer rejects the input.
    /// - [`ParserError::Structural`] if the tokens do not form a document,
    ///   such as a bare top-level scalar.
    /// - [`ParserError::PendingInput`] if the tokenizer still holds unread
    ///   bytes from an earlier call.
    /// - [`ParserError::Poisoned`] if an earlier call failed.
    ///
    /// Documents completed earlier in a failing call have already been
    /// handed to the callback.
    pub fn consume(&mut self, bytes: &[u8]) -> Result<usize, ParserError> {
        self.consume_len(bytes, bytes.len())
    }

    /// Feeds the first `length` bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// [`ParserError::LengthOutOfBounds`] if `length` exceeds `bytes.len()`,
    /// otherwise as for [`consume`](Self::consume).
    pub fn consume_len(&mut self, bytes: &[u8], length: usize) -> Result<usize, ParserError> {
        if self.failed {
            debug!(documents = self.documents, "parser used after failure");
            return Err(ParserError::Poisoned);
        }

        let result = match bytes.get(..length) {
            Some(prefix) => self.drive(prefix),
            None => Err(ParserError::LengthOutOfBounds {
                length,
                available: bytes.len(),
            }),
        };
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    fn drive(&mut self, bytes: &[u8]) -> Result<usize, ParserError> {
        if bytes.is_empty() {
            return Ok(0);
        }
        if !self.tokenizer.needs_input() {
            return Err(ParserError::PendingInput);
        }
        self.tokenizer.feed(bytes);

        let mut completed = 0;
        loop {
            let token = self.tokenizer.next_token()?;
            if token.is_not_available() {
                return Ok(completed);
            }
            if let Some(document) = self.builder.apply(token)? {
                completed += 1;
                self.documents += 1;
                trace!(
                    document = self.documents,
                    chunk_len = bytes.len(),
                    "document completed"
                );
                (self.on_document)(document);
            }
        }
    }

    fn fail(&mut self, err: &ParserError) {
        self.failed = true;
        debug!(error = %err, documents = self.documents, "parser failed");

        #[cfg(any(test, feature = "fuzzing"))]
        assert!(!self.panic_on_error, "{err}");
    }

    /// Current resumable state.
    pub fn state(&self) -> ParserState {
        if self.failed {
            ParserState::Failed
        } else if self.builder.depth() == 0 && self.tokenizer.is_between_values() {
            ParserState::Idle
        } else {
            ParserState::Suspended {
                depth: self.builder.depth(),
            }
        }
    }

    /// Number of open objects and arrays in the document being built.
    pub fn depth(&self) -> usize {
        self.builder.depth()
    }

    /// Number of documents completed since the parser was created.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// The tokenizer, e.g. to read its position.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Signals the end of the stream.
    ///
    /// Returns the total number of documents completed.
    ///
    /// # Errors
    ///
    /// - [`ParserError::Incomplete`] if the stream stopped inside a document
    ///   or a token.
    /// - [`ParserError::Poisoned`] if an earlier call failed.
    pub fn finish(self) -> Result<usize, ParserError> {
        match self.state() {
            ParserState::Idle => Ok(self.documents),
            ParserState::Suspended { depth } => {
                debug!(depth, documents = self.documents, "input ended inside a document");
                Err(ParserError::Incomplete)
            }
            ParserState::Failed => Err(ParserError::Poisoned),
        }
    }
}

impl<F, T> core::fmt::Debug for AsyncJsonParser<F, T>
where
    F: FnMut(Value),
    T: Tokenizer + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsyncJsonParser")
            .field("tokenizer", &self.tokenizer)
            .field("depth", &self.builder.depth())
            .field("documents", &self.documents)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}
