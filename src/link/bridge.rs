//! Link bridge: turns raw transport activity into control events.
//!
//! The transport reports two things: a level (peer attached or not) and a
//! stream of bytes.  The bridge edge-detects the level into
//! `Connected` / `Disconnected` and frames the bytes into `Data` records,
//! pushing everything onto the control event queue.  A remote watering
//! request is queued as the same command the button sends.

use log::info;

use super::framing::LineDecoder;
use super::handshake::WATER_REQUEST;
use crate::app::commands::AppCommand;
use crate::config::Delimiter;
use crate::events::{push_to, ControlEvent, EventQueue};

pub struct LinkBridge {
    decoder: LineDecoder,
    connected: bool,
}

impl LinkBridge {
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            decoder: LineDecoder::new(delimiter),
            connected: false,
        }
    }

    /// Report the current peer level.  Pushes an event only on a change.
    ///
    /// The change is recorded only once its event is queued, so an edge
    /// dropped by a full queue is retried on the next report.
    pub fn on_link_state(&mut self, up: bool, queue: &EventQueue) {
        if up == self.connected {
            return;
        }
        let event = if up {
            ControlEvent::Connected
        } else {
            ControlEvent::Disconnected
        };
        if !push_to(queue, event) {
            return;
        }
        self.connected = up;
        self.decoder.reset();
        if up {
            info!("link: peer connected");
        } else {
            info!("link: peer disconnected");
        }
    }

    /// Frame received bytes into records.
    pub fn on_rx(&mut self, data: &[u8], queue: &EventQueue) {
        self.decoder.feed(data, |record| {
            let event = if record == WATER_REQUEST {
                info!("link: watering requested by peer");
                ControlEvent::Command(AppCommand::WaterNow)
            } else {
                ControlEvent::Data(record)
            };
            push_to(queue, event);
        });
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
