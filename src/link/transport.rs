//! Transport abstraction: any byte-oriented serial channel to the fog node.
//!
//! Concrete implementations:
//! - UART to a BLE-UART bridge module (`adapters::uart_transport`, device only)
//! - [`NullTransport`] when no link hardware is fitted
//!
//! The I/O task is generic over `Transport`, so adding a new link requires
//! no change to the framing or the state machine.

use log::debug;

use crate::error::LinkError;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Whether a peer is currently attached at the radio layer.
    fn peer_connected(&self) -> bool;
}

/// A null transport that discards all writes and never connects.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn peer_connected(&self) -> bool {
        false
    }
}

/// Write all of `data`, retrying short writes.
///
/// A write that accepts nothing fails the record; the peer would otherwise
/// see a fragment glued to the next record.
pub fn write_all<T: Transport>(transport: &mut T, mut data: &[u8]) -> Result<(), LinkError> {
    while !data.is_empty() {
        match transport.write(data) {
            Ok(0) => {
                debug!("link: transport stalled with {} bytes unsent", data.len());
                return Err(LinkError::WriteFailed);
            }
            Ok(n) => data = &data[n.min(data.len())..],
            Err(e) => {
                debug!("link: transport write error: {:?}", e);
                return Err(LinkError::WriteFailed);
            }
        }
    }
    transport.flush().map_err(|e| {
        debug!("link: transport flush error: {:?}", e);
        LinkError::WriteFailed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `chunk` bytes per write.
    struct Trickle {
        chunk: usize,
        out: std::vec::Vec<u8>,
        flushed: bool,
    }

    impl Transport for Trickle {
        type Error = ();

        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
            Ok(0)
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            let n = data.len().min(self.chunk);
            self.out.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushed = true;
            Ok(())
        }

        fn peer_connected(&self) -> bool {
            true
        }
    }

    #[test]
    fn write_all_retries_short_writes() {
        let mut t = Trickle {
            chunk: 3,
            out: std::vec::Vec::new(),
            flushed: false,
        };
        write_all(&mut t, b"whoiam:vase$").unwrap();
        assert_eq!(t.out, b"whoiam:vase$");
        assert!(t.flushed);
    }

    #[test]
    fn stalled_write_fails_the_record() {
        let mut t = Trickle {
            chunk: 0,
            out: std::vec::Vec::new(),
            flushed: false,
        };
        assert_eq!(
            write_all(&mut t, b"EOS$"),
            Err(LinkError::WriteFailed)
        );
        assert!(!t.flushed);
    }

    #[test]
    fn null_transport_never_connects() {
        let mut t = NullTransport;
        let mut buf = [0u8; 8];
        assert_eq!(t.read(&mut buf), Ok(0));
        assert!(!t.peer_connected());
    }
}
