//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log today).

use crate::fsm::context::{Anomaly, SensorSample};
use crate::fsm::Mode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries initial mode).
    Started(Mode),

    /// The FSM moved between modes.
    ModeChanged { from: Mode, to: Mode },

    /// A telemetry burst was handed to the link.
    TelemetrySent(SensorSample),

    /// A non-fatal anomaly was observed.
    Anomaly(Anomaly),

    /// Diagnostic snapshot requested from the button.
    Snapshot(SensorSample),

    /// A pump hold completed.
    Watered { duration_ms: u32 },
}
