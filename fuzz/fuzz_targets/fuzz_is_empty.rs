#![no_main]

use blockcheck::{scan, ScanOptions, ScanOutcome};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|input: (u16, Vec<u8>)| {
    let (chunk_size, data) = input;
    let options = ScanOptions::default().with_chunk_size(usize::from(chunk_size).max(1));

    let outcome = scan(Cursor::new(&data), &options).unwrap();
    let expected = match data.iter().position(|&b| b != 0) {
        Some(i) => ScanOutcome::Dirty { offset: i as u64 },
        None => ScanOutcome::Empty {
            bytes_scanned: data.len() as u64,
        },
    };
    assert_eq!(outcome, expected);
});
