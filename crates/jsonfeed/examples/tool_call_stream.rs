//! Reacts to tool calls as soon as each one is complete, while the rest of a
//! model's response is still streaming in.
//!
//! The assistant emits one JSON object per line. Chunks arrive at arbitrary
//! byte boundaries, so a chunk may end inside a multi-byte character, inside
//! an escape, or hold the tail of one call and the head of the next.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=jsonfeed=trace cargo run -p jsonfeed --example tool_call_stream
//! ```

use jsonfeed::{AsyncJsonParser, ParserError, ParserOptions, ParserState, Value};
use tracing_subscriber::EnvFilter;

fn dispatch(call: &Value) {
    let name = call.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
    let arguments = call.get("arguments").map_or_else(String::new, Value::to_string);
    println!("-> {name}({arguments})");
}

fn main() -> Result<(), ParserError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // In real life this would come from the network.
    let simulated_stream: [&[u8]; 8] = [
        b"{\"name\":\"search\",\"arguments\":{\"query\":\"caf\xC3",
        b"\xA9 near me\",\"limit\":3}}\n{\"name\":\"wea",
        b"ther\",\"arguments\":{\"city\":\"Z\xC3\xBCrich\",",
        b"\"days\":[1,2",
        b",3]}}\n{\"name\":\"note\",\"arguments\":{\"text\":\"done \\ud83e",
        b"\\udd80\"}}",
        b"\n{\"name\":\"broken\",\"arguments\":{\"x\":",
        b" tru}}\n",
    ];

    let options = ParserOptions {
        max_depth: Some(32),
        max_string_len: Some(64 * 1024),
        ..ParserOptions::default()
    };
    let mut parser = AsyncJsonParser::with_options(options, |call| dispatch(&call));

    for chunk in simulated_stream {
        match parser.consume(chunk) {
            Ok(_) => {
                if let ParserState::Suspended { depth } = parser.state() {
                    println!("   ... waiting for more input (depth {depth})");
                }
            }
            Err(err) => {
                eprintln!("stream rejected after {} calls: {err}", parser.documents());
                return Ok(());
            }
        }
    }

    let calls = parser.finish()?;
    println!("{calls} calls");
    Ok(())
}
