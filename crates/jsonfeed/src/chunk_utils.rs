/// Split `payload` into `parts` chunks of roughly equal size.
///
/// Boundaries are placed by byte count alone, so they regularly fall inside
/// strings, escapes and multi-byte UTF-8 sequences. This is intended for
/// exercising incremental parsers.
///
/// ```rust
/// use jsonfeed::produce_chunks;
///
/// let chunks = produce_chunks("[\"é\"]".as_bytes(), 2);
/// assert_eq!(chunks, [&b"[\"\xC3"[..], b"\xA9\"]"]);
/// ```
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}
