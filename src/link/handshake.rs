//! Pairing vocabulary exchanged with the fog node.
//!
//! ```text
//!  fog node                      vase
//!     │ ── whoareyou ──────────────▶ │
//!     │ ◀────────────── whoiam:vase ─ │
//!     │ ── OK ─────────────────────▶ │   Registering → Communicating
//!     │ ◀──────────── temperature:21 ─│
//!     │ ◀────────────────── light:80 ─│
//!     │ ◀────────────── moisture:412 ─│
//!     │ ◀─────────────────────── EOS ─│   Communicating → Waiting
//! ```
//!
//! Decoding is stateless and exact-match only.  `whoiam:` and the
//! telemetry records are write-only from this side and are never parsed.
//!
//! Outside the pairing exchange the peer may send [`WATER_REQUEST`] at any
//! time.  The link bridge turns it into a local watering command, so it
//! never reaches the handshake.

use core::fmt;

use super::framing::Record;
use crate::fsm::context::SensorSample;

pub const WHO_ARE_YOU: &str = "whoareyou";
pub const ACCEPTED: &str = "OK";
pub const IDENTITY_PREFIX: &str = "whoiam:";
pub const END_OF_STREAM: &str = "EOS";
/// Remote request to water on the next Monitoring tick.
pub const WATER_REQUEST: &str = "water";

/// Telemetry channel names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Light,
    Moisture,
}

impl Metric {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Light => "light",
            Self::Moisture => "moisture",
        }
    }
}

/// One token of the pairing protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeToken {
    WhoAreYou,
    WhoIAm(Record),
    Ok,
    KeyValue { name: Metric, value: f32 },
    EndOfStream,
    Unrecognized(Record),
}

impl HandshakeToken {
    /// Decode one inbound record.
    pub fn decode(raw: &Record) -> Self {
        match raw.as_str() {
            WHO_ARE_YOU => Self::WhoAreYou,
            ACCEPTED => Self::Ok,
            _ => Self::Unrecognized(raw.clone()),
        }
    }

    /// Identity announcement for `identity`.
    pub fn announce(identity: &str) -> Self {
        let mut id = Record::new();
        // Identity is bounded by config validation well below the record size.
        let _ = id.push_str(identity);
        Self::WhoIAm(id)
    }

    /// Tokens handled by the handshake layer in any mode.
    pub fn is_session_control(&self) -> bool {
        matches!(self, Self::WhoAreYou | Self::Ok)
    }
}

impl fmt::Display for HandshakeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WhoAreYou => f.write_str(WHO_ARE_YOU),
            Self::WhoIAm(id) => write!(f, "{IDENTITY_PREFIX}{id}"),
            Self::Ok => f.write_str(ACCEPTED),
            Self::KeyValue { name, value } => write!(f, "{}:{}", name.name(), value),
            Self::EndOfStream => f.write_str(END_OF_STREAM),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// The four records of one telemetry burst, in wire order.
pub fn telemetry_burst(sample: &SensorSample) -> [HandshakeToken; 4] {
    [
        HandshakeToken::KeyValue {
            name: Metric::Temperature,
            value: sample.temperature_c,
        },
        HandshakeToken::KeyValue {
            name: Metric::Light,
            value: sample.light,
        },
        HandshakeToken::KeyValue {
            name: Metric::Moisture,
            value: sample.moisture_raw,
        },
        HandshakeToken::EndOfStream,
    ]
}
