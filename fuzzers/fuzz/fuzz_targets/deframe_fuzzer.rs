#![no_main]
use libfuzzer_sys::fuzz_target;
use pbstream::{DelimitedDeframer, StreamReader};
use std::io::Cursor;

// Arbitrary bytes must never panic the delimited deframer, and no frame may
// exceed the configured limit.
fuzz_target!(|data: &[u8]| {
    const LIMIT: usize = 4096;
    let mut reader = StreamReader::new(Cursor::new(data), DelimitedDeframer::new(LIMIT));
    while let Ok(Some(payload)) = reader.read_message() {
        assert!(payload.len() <= LIMIT);
    }
});
