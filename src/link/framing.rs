//! Delimiter-framed text records.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────┬───────────┐
//! │ UTF-8 text (≤ 63 B)  │ delimiter │
//! └──────────────────────┴───────────┘
//! ```
//!
//! The decoder accumulates incoming bytes and yields one complete record
//! per delimiter.  A single `Transport::read` may return part of a record
//! or several records concatenated; both are handled.

use heapless::{String, Vec};

use crate::config::Delimiter;

/// Maximum record payload, delimiter excluded.
pub const MAX_RECORD_LEN: usize = 63;

/// One decoded text record.
pub type Record = String<64>;

/// Streaming record decoder.
pub struct LineDecoder {
    delimiter: Delimiter,
    buf: Vec<u8, MAX_RECORD_LEN>,
    /// Set when the current record outgrew `buf`; the rest of it is skipped.
    overflowed: bool,
    /// Newline mode: a `\r` seen but not yet stored.  Dropped if the next
    /// byte ends the record, so `\r\n` costs no payload space.
    held_cr: bool,
}

impl LineDecoder {
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            buf: Vec::new(),
            overflowed: false,
            held_cr: false,
        }
    }

    /// Push one byte.  Returns `Some(record)` when `byte` closes a valid record.
    pub fn push(&mut self, byte: u8) -> Option<Record> {
        if byte != self.delimiter.byte() {
            if core::mem::take(&mut self.held_cr) {
                self.store(b'\r');
            }
            if byte == b'\r' && self.delimiter == Delimiter::NewLine {
                self.held_cr = true;
            } else {
                self.store(byte);
            }
            return None;
        }

        self.held_cr = false;
        let overflowed = core::mem::replace(&mut self.overflowed, false);
        let bytes: &[u8] = &self.buf;

        let record = if overflowed || bytes.is_empty() {
            if overflowed {
                log::warn!("link: record exceeded {} bytes, discarded", MAX_RECORD_LEN);
            }
            None
        } else {
            match core::str::from_utf8(bytes) {
                Ok(text) => {
                    let mut record = Record::new();
                    // Cannot fail: `bytes` is at most MAX_RECORD_LEN long.
                    let _ = record.push_str(text);
                    Some(record)
                }
                Err(_) => {
                    log::warn!("link: non-UTF-8 record discarded");
                    None
                }
            }
        };

        self.buf.clear();
        record
    }

    fn store(&mut self, byte: u8) {
        if self.buf.push(byte).is_err() {
            self.overflowed = true;
        }
    }

    /// Feed a chunk, calling `on_record` for every complete record.
    pub fn feed(&mut self, data: &[u8], mut on_record: impl FnMut(Record)) {
        for &byte in data {
            if let Some(record) = self.push(byte) {
                on_record(record);
            }
        }
    }

    /// Drop any partial record (e.g. after the peer disconnects).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
        self.held_cr = false;
    }

    /// Payload bytes buffered for the record in progress.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Append the delimiter to `text`, producing one outbound record.
///
/// Returns `None` if the framed record would exceed the record buffer.
pub fn frame_record(text: &str, delimiter: Delimiter) -> Option<String<64>> {
    if text.len() > MAX_RECORD_LEN {
        return None;
    }
    let mut out = String::new();
    out.push_str(text).ok()?;
    out.push(delimiter.as_char()).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(decoder: &mut LineDecoder, data: &[u8]) -> std::vec::Vec<std::string::String> {
        let mut out = std::vec::Vec::new();
        decoder.feed(data, |r| out.push(r.as_str().to_owned()));
        out
    }

    #[test]
    fn splits_on_dollar() {
        let mut d = LineDecoder::new(Delimiter::Dollar);
        assert_eq!(collect(&mut d, b"whoareyou$OK$"), ["whoareyou", "OK"]);
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn partial_record_waits_for_delimiter() {
        let mut d = LineDecoder::new(Delimiter::Dollar);
        assert!(collect(&mut d, b"whoa").is_empty());
        assert_eq!(d.pending(), 4);
        assert_eq!(collect(&mut d, b"reyou$"), ["whoareyou"]);
    }

    #[test]
    fn newline_mode_strips_carriage_return() {
        let mut d = LineDecoder::new(Delimiter::NewLine);
        assert_eq!(collect(&mut d, b"OK\r\nwhoareyou\n"), ["OK", "whoareyou"]);
    }

    #[test]
    fn crlf_record_at_capacity_is_kept() {
        let mut d = LineDecoder::new(Delimiter::NewLine);
        let mut data = std::vec![b'a'; MAX_RECORD_LEN];
        data.extend_from_slice(b"\r\n");
        let out = collect(&mut d, &data);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), MAX_RECORD_LEN);
    }

    #[test]
    fn newline_mode_keeps_inner_carriage_return() {
        let mut d = LineDecoder::new(Delimiter::NewLine);
        assert_eq!(collect(&mut d, b"a\rb\r\r\n"), ["a\rb\r"]);
    }

    #[test]
    fn dollar_mode_keeps_newlines_verbatim() {
        let mut d = LineDecoder::new(Delimiter::Dollar);
        assert_eq!(collect(&mut d, b"OK\n$"), ["OK\n"]);
    }

    #[test]
    fn empty_records_are_skipped() {
        let mut d = LineDecoder::new(Delimiter::Hash);
        assert_eq!(collect(&mut d, b"##OK##"), ["OK"]);
    }

    #[test]
    fn oversized_record_is_discarded_and_decoder_recovers() {
        let mut d = LineDecoder::new(Delimiter::Dollar);
        let long = [b'x'; MAX_RECORD_LEN + 10];
        assert!(collect(&mut d, &long).is_empty());
        assert_eq!(collect(&mut d, b"$OK$"), ["OK"]);
    }

    #[test]
    fn record_at_capacity_is_kept() {
        let mut d = LineDecoder::new(Delimiter::Dollar);
        let mut data = [b'a'; MAX_RECORD_LEN + 1];
        data[MAX_RECORD_LEN] = b'$';
        let out = collect(&mut d, &data);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), MAX_RECORD_LEN);
    }

    #[test]
    fn invalid_utf8_is_discarded() {
        let mut d = LineDecoder::new(Delimiter::Dollar);
        assert!(collect(&mut d, &[0xff, 0xfe, b'$']).is_empty());
        assert_eq!(collect(&mut d, b"OK$"), ["OK"]);
    }

    #[test]
    fn reset_drops_partial_record() {
        let mut d = LineDecoder::new(Delimiter::Dollar);
        collect(&mut d, b"who");
        d.reset();
        assert_eq!(collect(&mut d, b"OK$"), ["OK"]);
    }

    #[test]
    fn frame_record_appends_delimiter() {
        let framed = frame_record("whoiam:vase", Delimiter::Dollar).unwrap();
        assert_eq!(framed.as_str(), "whoiam:vase$");
        let framed = frame_record("EOS", Delimiter::NewLine).unwrap();
        assert_eq!(framed.as_str(), "EOS\n");
    }

    #[test]
    fn frame_record_rejects_oversize() {
        let long = "y".repeat(MAX_RECORD_LEN + 1);
        assert!(frame_record(&long, Delimiter::Comma).is_none());
    }
}
