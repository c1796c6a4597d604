#![allow(clippy::float_cmp)]

use rstest::rstest;

use super::parse_chunks;
use crate::{Value, produce_chunks};

/// Parses `input` whole, byte by byte and in three chunks; all must agree.
fn parse_all_ways(input: &str) -> Vec<Value> {
    let bytes = input.as_bytes();
    let whole = parse_chunks([bytes]).unwrap();
    assert_eq!(parse_chunks(bytes.chunks(1)).unwrap(), whole, "bytewise");
    assert_eq!(parse_chunks(produce_chunks(bytes, 3)).unwrap(), whole, "chunked");
    whole
}

#[rstest]
#[case("{}", "{}")]
#[case("[]", "[]")]
#[case(" \t\r\n[ ] ", "[]")]
#[case(r#"{"a":null}"#, r#"{"a":null}"#)]
#[case("[true,false,null]", "[true,false,null]")]
#[case("[0, -0, 12, -34]", "[0,0,12,-34]")]
#[case("[0.5, -1.25e2, 1E-2, 3.0]", "[0.5,-125.0,0.01,3.0]")]
#[case(r#"[{"a":[{"b":[[]]}]}]"#, r#"[{"a":[{"b":[[]]}]}]"#)]
#[case(r#"{"z":1,"a":2,"m":3}"#, r#"{"z":1,"a":2,"m":3}"#)]
#[case(r#"{"a":1,"a":2}"#, r#"{"a":2}"#)]
#[case(r#"["é€😀"]"#, r#"["é€😀"]"#)]
#[case(r#"["\/\b\f"]"#, r#"["/\u0008\u000C"]"#)]
#[case(r#"{"":""}"#, r#"{"":""}"#)]
#[case("[\"tab\\there\"]", r#"["tab\there"]"#)]
fn parses_single_document(#[case] input: &str, #[case] rendered: &str) {
    let values = parse_all_ways(input);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].to_string(), rendered);
}

#[test]
fn integers_and_floats_stay_apart() {
    let values = parse_all_ways("[1, 1.0, 1e0, -9223372036854775808]");
    let items = values[0].as_array().unwrap();
    assert_eq!(items[0], Value::Integer(1));
    assert_eq!(items[1], Value::Float(1.0));
    assert_eq!(items[2], Value::Float(1.0));
    assert_eq!(items[3].as_i64(), Some(i64::MIN));
}

#[test]
fn multibyte_keys_and_values() {
    let values = parse_all_ways(r#"{"ключ": "значение", "鍵": ["値", "🦀"]}"#);
    let doc = &values[0];
    assert_eq!(doc.get("ключ").and_then(Value::as_str), Some("значение"));
    assert_eq!(doc.get("鍵").unwrap().to_string(), r#"["値","🦀"]"#);
}

#[test]
fn concatenated_documents() {
    let values = parse_all_ways("[1]{\"a\":[]}\n[2] [3]");
    let rendered: Vec<_> = values.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["[1]", r#"{"a":[]}"#, "[2]", "[3]"]);
}

#[test]
fn deep_nesting_without_limit() {
    let depth = 2_000;
    let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let values = parse_all_ways(&input);
    assert_eq!(values.len(), 1);

    let mut node = &values[0];
    let mut seen = 1;
    while let Some([inner]) = node.as_array().map(Vec::as_slice) {
        node = inner;
        seen += 1;
    }
    assert_eq!(seen, depth);
}

#[test]
fn very_deep_document_with_default_options() {
    let depth = 200_000;
    let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));

    for parts in [1, 1_000] {
        let values = parse_chunks(produce_chunks(input.as_bytes(), parts)).unwrap();
        assert_eq!(values.len(), 1);

        let mut node = &values[0];
        let mut seen = 1;
        while let Some([inner]) = node.as_array().map(Vec::as_slice) {
            node = inner;
            seen += 1;
        }
        assert_eq!(seen, depth, "{parts} parts");
    }
}
