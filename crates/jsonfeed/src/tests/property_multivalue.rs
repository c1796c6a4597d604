use quickcheck::{QuickCheck, TestResult};

use super::{arbitrary::Document, parse_chunks, quickcheck_tests, split_by};
use crate::AsyncJsonParser;

/// Property: A stream of several roots yields one completion per root, in
/// order, regardless of separators and partitioning.
#[test]
fn multi_value_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(docs: Vec<Document>, splits: Vec<usize>, separated: bool) -> TestResult {
        if docs.is_empty() {
            return TestResult::discard();
        }

        let separator = if separated { "\n" } else { "" };
        let payload = docs
            .iter()
            .map(|doc| doc.0.to_string())
            .collect::<Vec<_>>()
            .join(separator);

        let values = parse_chunks(split_by(payload.as_bytes(), &splits)).unwrap();
        let expected: Vec<_> = docs.into_iter().map(|doc| doc.0).collect();
        TestResult::from_bool(values == expected)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<Document>, Vec<usize>, bool) -> TestResult);
}

/// Property: Wrapping the same roots in one array yields a single completion.
#[test]
fn wrapped_roots_complete_once_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(docs: Vec<Document>, splits: Vec<usize>) -> bool {
        let payload = format!(
            "[{}]",
            docs.iter()
                .map(|doc| doc.0.to_string())
                .collect::<Vec<_>>()
                .join(",")
        );

        let mut count = 0;
        let mut parser = AsyncJsonParser::new(|_| count += 1);
        let mut completed = 0;
        for chunk in split_by(payload.as_bytes(), &splits) {
            completed += parser.consume(chunk).unwrap();
        }
        parser.finish().unwrap();
        count == 1 && completed == 1
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<Document>, Vec<usize>) -> bool);
}

#[test]
fn completion_count_matches_roots() {
    for (payload, expected) in [
        ("[{},[],{}]", 1),
        ("[1,2,3]", 1),
        ("[1][2][3]", 3),
        ("{}{}", 2),
        (" [ ] \n\t{ } ", 2),
    ] {
        let values = parse_chunks([payload.as_bytes()]).unwrap();
        assert_eq!(values.len(), expected, "{payload}");
    }
}
