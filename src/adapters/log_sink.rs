//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::Anomaly;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?} [{}]", from, to, to.glyph());
            }
            AppEvent::TelemetrySent(s) => {
                info!(
                    "TELEM | T={:.1}\u{00b0}C | light={:.0} | moisture={:.0}",
                    s.temperature_c, s.light, s.moisture_raw,
                );
            }
            AppEvent::Anomaly(anomaly) => match anomaly {
                Anomaly::Protocol(record) => {
                    warn!("ANOMALY | unexpected record '{}'", record);
                }
                Anomaly::SpuriousData(record) => {
                    warn!("ANOMALY | data outside a session '{}'", record);
                }
                Anomaly::LostConnection(mode) => {
                    warn!("ANOMALY | link lost while {:?}", mode);
                }
                Anomaly::ReservoirEmpty => {
                    warn!("ANOMALY | reservoir empty, watering skipped");
                }
            },
            AppEvent::Snapshot(s) => match serde_json::to_string(s) {
                Ok(json) => info!("SNAPSHOT | {}", json),
                Err(e) => warn!("SNAPSHOT | serialise failed: {}", e),
            },
            AppEvent::Watered { duration_ms } => {
                info!("WATER | pump ran {}ms", duration_ms);
            }
        }
    }
}
