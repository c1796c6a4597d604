#![allow(missing_docs)]
#![allow(dead_code)]

/// Three tool calls, as a model streams them: one JSON document per line.
pub const ORIGINAL: [&str; 3] = [
    r#"{"id":"call_1","name":"search","arguments":{"query":"café près de moi","limit":5}}"#,
    r#"{"id":"call_2","name":"weather","arguments":{"city":"Zürich","units":"metric","days":[1,2,3]}}"#,
    r#"{"id":"call_3","name":"note","arguments":{"text":"line1\nline2 \ud83e\udd80","tags":[]}}"#,
];

// The same stream as it arrives over the wire. Chunks are cut on seams that
// stress a push parser: inside UTF-8 sequences, between the halves of an
// escape, between a surrogate pair, and with a document's last byte sharing
// a chunk with the start of the next one.
#[rustfmt::skip]
pub const STREAM: [&[u8]; 12] = [
    b"{\"id\":\"call_1\",\"name\":\"sea",                          // mid-string
    b"rch\",\"arguments\":{\"query\":\"caf\xC3",                   // ends inside 'é'
    b"\xA9 pr\xC3\xA8s de moi\",\"limit\":",                       // finishes 'é', ends before a number
    b"5}",                                                          // number delimited by '}'
    b"}\n{\"id\":\"call_2\"",                                       // completes call_1, starts call_2
    b",\"name\":\"weather\",\"arguments\":{\"city\":\"Z\xC3\xBC",  // ends after a whole 'ü'
    b"rich\",\"units\":\"metric\",\"days\":[1,2,",                  // ends after a comma
    b"3]}}\n{\"id\":\"call_3\",\"name\":\"note\",\"arguments\":{\"text\":\"line1\\", // completes call_2, ends on a backslash
    b"nline2 \\ud83e",                                              // high surrogate only
    b"\\udd80\",\"tags\":[",                                        // low surrogate, open array
    b"]}}",                                                         // completes call_3
    b"\n",
];

/// Index of the chunk in `STREAM` that completes each document.
pub const COMPLETED_AT: [usize; 3] = [4, 7, 10];

#[test]
fn assert_stream_example() {
    let streamed = STREAM.concat();
    let original = format!("{}\n", ORIGINAL.join("\n"));
    assert_eq!(String::from_utf8(streamed).unwrap(), original);
}
