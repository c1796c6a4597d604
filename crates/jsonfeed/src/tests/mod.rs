mod arbitrary;
mod parse_good;
mod property_multivalue;

use crate::{AsyncJsonParser, ParserError, Value};

/// Number of cases per quickcheck property.
pub(crate) fn quickcheck_tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Parses a stream delivered as `chunks` and returns the documents it holds.
pub(crate) fn parse_chunks<'a>(
    chunks: impl IntoIterator<Item = &'a [u8]>,
) -> Result<Vec<Value>, ParserError> {
    let mut documents = Vec::new();
    let mut parser = AsyncJsonParser::new(|doc| documents.push(doc));
    for chunk in chunks {
        parser.consume(chunk)?;
    }
    parser.finish()?;
    Ok(documents)
}

/// Cuts `bytes` at positions derived from `splits`. Chunks may be empty and
/// may end anywhere, including inside a UTF-8 sequence.
pub(crate) fn split_by<'a>(bytes: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(splits.len() + 1);
    let mut rest = bytes;
    for split in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(split % (rest.len() + 1));
        chunks.push(head);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}
