//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (sensors, pump, status display, link, clock, event
//! sinks) implement these traits.  The [`Controller`](super::service::Controller)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! Sensor and pump ports are infallible: the hardware returns a
//! best-effort value and the core does not model read/write failure.

use crate::error::LinkError;
use crate::fsm::context::SensorSample;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain a fresh sample.
pub trait SensorPort {
    fn read(&mut self) -> SensorSample;
}

// ───────────────────────────────────────────────────────────────
// Pump port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait PumpPort {
    fn set_pump(&mut self, on: bool);

    fn is_pump_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Status indicator port
// ───────────────────────────────────────────────────────────────

/// Renders the one-character mode glyph.
pub trait StatusIndicator {
    fn show(&mut self, glyph: char);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Block the control thread for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Everything the control loop drives on the board side.
pub trait Board: SensorPort + PumpPort + StatusIndicator + ClockPort {}

impl<T: SensorPort + PumpPort + StatusIndicator + ClockPort> Board for T {}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain → fog node)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the serial link.
///
/// `record` is one unframed token; the adapter appends the delimiter.
pub trait LinkPort {
    fn send(&mut self, record: &str) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
