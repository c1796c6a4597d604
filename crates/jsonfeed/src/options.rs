/// Configuration options for [`AsyncJsonParser`](crate::AsyncJsonParser) and
/// the default [`ByteTokenizer`](crate::ByteTokenizer).
///
/// # Examples
///
/// ```rust
/// use jsonfeed::{AsyncJsonParser, ParserOptions};
///
/// let options = ParserOptions {
///     max_depth: Some(64),
///     ..Default::default()
/// };
/// let mut parser = AsyncJsonParser::with_options(options, |_doc| {});
/// parser.consume(b"[[[]]]").unwrap();
/// ```
///
/// # Default
///
/// No limits are applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Maximum nesting depth of objects and arrays.
    ///
    /// A top-level `{}` has depth 1. Opening a container beyond the limit
    /// fails with
    /// [`StructuralError::DepthLimitExceeded`](crate::StructuralError::DepthLimitExceeded).
    ///
    /// Building and dropping documents cost the same at any depth. Rendering
    /// a [`Value`](crate::Value) with `Display`, comparing or serializing it
    /// recurses, so set a limit when such documents come from untrusted input.
    ///
    /// # Default
    ///
    /// `None` (unlimited)
    pub max_depth: Option<usize>,

    /// Maximum length in bytes of a single string value or field name, after
    /// escapes are decoded.
    ///
    /// # Default
    ///
    /// `None` (unlimited)
    pub max_string_len: Option<usize>,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on errors instead of returning them.
    ///
    /// Enabled only in test and fuzzing builds to produce backtraces on parse
    /// failures.
    pub panic_on_error: bool,
}
