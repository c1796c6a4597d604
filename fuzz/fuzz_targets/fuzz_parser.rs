#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonfeed::{AsyncJsonParser, ParserError, ParserOptions, Value};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::Map;

const HEADER: usize = 4; // 4-byte split seed

// Below serde_json's recursion limit so both parsers see the same documents.
const MAX_DEPTH: usize = 100;

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b""];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[..HEADER].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let limit = max_size - prefix;
            let written = append_document(&mut data[prefix..], size, limit);
            prefix += written;
            prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
            if written == 0 {
                break;
            }
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends up to 4 bytes of JSON whitespace, never more than `limit`.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        let mut written = 0;
        for _ in 0..rng.random_range(0..4) {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

/// Appends one serialized array or object. The tail may be cut off by
/// `limit`, which leaves a truncated document for the parser to reject.
fn append_document(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(document) = ArbitraryDocument::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break document;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(serde_json::Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(22)? {
            0 => serde_json::Value::Null,
            1 => serde_json::Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                serde_json::Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => serde_json::Value::from(u.arbitrary::<i64>()?),
            4..=10 => serde_json::Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                serde_json::Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=21 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                serde_json::Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// A value whose root is a container, the only kind of root the parser
/// accepts.
#[derive(Debug)]
struct ArbitraryDocument(serde_json::Value);

impl<'a> Arbitrary<'a> for ArbitraryDocument {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let ArbitraryValue(value) = u.arbitrary()?;
        let value = match value {
            value @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => value,
            scalar => serde_json::Value::Array(vec![scalar]),
        };
        Ok(ArbitraryDocument(value))
    }
}

fn run<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> (Vec<Value>, Result<usize, ParserError>) {
    let options = ParserOptions {
        max_depth: Some(MAX_DEPTH),
        max_string_len: None,
        panic_on_error: false,
    };
    let mut documents = Vec::new();
    let mut parser = AsyncJsonParser::with_options(options, |doc| documents.push(doc));
    let mut result = Ok(0);
    for chunk in chunks {
        if let Err(err) = parser.consume(chunk) {
            result = Err(err);
            break;
        }
    }
    if result.is_ok() {
        result = parser.finish();
    } else {
        drop(parser);
    }
    (documents, result)
}

/// Cuts `data` anywhere, including inside UTF-8 sequences and escapes.
fn split_into_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut rest = data;
    let mut state = split_seed | 1;
    while !rest.is_empty() {
        // xorshift
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let size = (state as usize % rest.len()) + 1;
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let split_seed = u64::from(u32::from_le_bytes(data[..HEADER].try_into().unwrap()));
    let data = &data[HEADER..];

    let (whole_docs, whole) = run([data]);
    let (split_docs, split) = run(split_into_chunks(data, split_seed));

    // Error positions for invalid UTF-8 depend on where a run was cut, so only
    // the outcome is compared.
    assert_eq!(whole.is_ok(), split.is_ok(), "{whole:?} vs {split:?}");
    assert_eq!(whole_docs, split_docs);

    if let Ok(count) = whole {
        assert_eq!(count, whole_docs.len());
        let reference = serde_json::Deserializer::from_slice(data)
            .into_iter::<serde_json::Value>()
            .collect::<Result<Vec<_>, _>>()
            .expect("serde_json rejected a stream the parser accepted");
        assert_eq!(reference.len(), count);
    }
}

fuzz_target!(|data: &[u8]| parser(data));
