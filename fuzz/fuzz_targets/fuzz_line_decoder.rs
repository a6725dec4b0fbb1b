//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming record decoder
//! under every delimiter and asserts that it never panics, never yields
//! an empty or oversized record, and recovers cleanly after a reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use critical_section as _;
use libfuzzer_sys::fuzz_target;
use plantvase::config::Delimiter;
use plantvase::link::framing::{LineDecoder, MAX_RECORD_LEN};

fuzz_target!(|data: &[u8]| {
    for delimiter in [
        Delimiter::NewLine,
        Delimiter::Comma,
        Delimiter::Dollar,
        Delimiter::Hash,
    ] {
        let mut decoder = LineDecoder::new(delimiter);
        decoder.feed(data, |record| {
            assert!(!record.is_empty(), "decoder must not yield empty records");
            assert!(record.len() <= MAX_RECORD_LEN, "record exceeds buffer");
            assert!(
                !record.as_bytes().contains(&delimiter.byte()),
                "record contains its delimiter"
            );
        });
        assert!(decoder.pending() <= MAX_RECORD_LEN);

        decoder.reset();
        assert_eq!(decoder.pending(), 0);
        decoder.feed(data, |_| {});
    }
});
