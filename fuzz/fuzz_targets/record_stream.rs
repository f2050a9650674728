#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use recipe_stats::decoder::RecordStream;

fuzz_target!(|data: &[u8]| {
    // Malformed input must end the stream with an error, never panic or loop.
    let mut stream = RecordStream::new(Cursor::new(data));
    let mut yielded = 0usize;
    for item in stream.by_ref() {
        if item.is_err() {
            break;
        }
        yielded += 1;
    }
    assert_eq!(yielded, stream.decoded());
    assert!(stream.next().is_none());
});
