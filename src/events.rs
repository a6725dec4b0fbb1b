//! Control event queue.
//!
//! Events are produced by:
//! - The link I/O task (peer connect / disconnect, inbound records)
//! - The button task (manual commands)
//!
//! Events are consumed by the control loop one at a time, strictly
//! between steps.  A step (including a pump hold) always runs to
//! completion before the next event is dispatched.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Link I/O    │────▶│  EVENT_QUEUE │────▶│ Control Loop │
//! │ Button      │────▶│  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::warn;

use crate::app::commands::AppCommand;
use crate::link::framing::Record;

/// Queue depth.  A telemetry handshake needs two inbound records, so this
/// leaves headroom for a burst arriving during a pump hold.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Inputs to the controller from outside the control thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// A peer attached to the serial link.
    Connected,
    /// The peer detached.
    Disconnected,
    /// One delimited record arrived.
    Data(Record),
    /// A local command (button gesture).
    Command(AppCommand),
}

pub type EventQueue = Channel<CriticalSectionRawMutex, ControlEvent, EVENT_QUEUE_DEPTH>;

/// The process-wide queue shared by the I/O task and the control loop.
pub static EVENT_QUEUE: EventQueue = Channel::new();

/// Push an event into `queue`.  Never blocks.
/// Returns `false` if the queue is full (event dropped).
pub fn push_to(queue: &EventQueue, event: ControlEvent) -> bool {
    match queue.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(dropped)) => {
            warn!("events: queue full, dropping {:?}", dropped);
            false
        }
    }
}

/// Drain every pending event from `queue`, calling `handler` for each.
pub fn drain_from(queue: &EventQueue, mut handler: impl FnMut(ControlEvent)) {
    while let Ok(event) = queue.try_receive() {
        handler(event);
    }
}
