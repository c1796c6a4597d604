//! An incremental, push-based JSON parser.
//!
//! Bytes arrive in chunks of any size through
//! [`AsyncJsonParser::consume`]; every time the cumulative input completes a
//! top-level object or array, the parser hands the fully built [`Value`] to a
//! callback. Nothing is emitted for partial documents, and nothing blocks:
//! when a chunk runs out mid-token the parser simply returns and picks up
//! where it left off on the next call.
//!
//! ```rust
//! use jsonfeed::{AsyncJsonParser, Value};
//!
//! let mut names = Vec::new();
//! let mut parser = AsyncJsonParser::new(|doc: Value| {
//!     names.push(doc.get("name").and_then(Value::as_str).map(str::to_owned));
//! });
//!
//! for chunk in [&b"{\"na"[..], b"me\": \"r\xC3", b"\xA9sum\xC3\xA9\"}\n{\"name\":", b" null}"] {
//!     parser.consume(chunk).unwrap();
//! }
//! parser.finish().unwrap();
//!
//! assert_eq!(names, [Some("résumé".to_owned()), None]);
//! ```
//!
//! The parser is generic over its [`Tokenizer`]; [`ByteTokenizer`] is a strict
//! RFC 8259 implementation and the default.

mod chunk_utils;
mod error;
mod options;
mod parser;
mod token;
mod tokenizer;
mod tree_builder;
mod value;

#[cfg(test)]
mod tests;

pub use chunk_utils::produce_chunks;
pub use error::{LexError, ParserError, StructuralError, SyntaxError};
pub use options::ParserOptions;
pub use parser::{AsyncJsonParser, ParserState};
pub use token::{Token, Tokenizer};
pub use tokenizer::ByteTokenizer;
pub use value::{Array, Map, Value};
