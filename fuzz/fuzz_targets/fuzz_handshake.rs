//! Fuzz target: inbound records through the mode machine.
//!
//! Splits the input into records, replays them (with connect/disconnect
//! edges keyed off the first byte of each record) against a fresh
//! controller and asserts the loop never panics and never leaves the
//! pump running.
//!
//! cargo fuzz run fuzz_handshake

#![no_main]

use critical_section as _;
use libfuzzer_sys::fuzz_target;
use plantvase::app::events::AppEvent;
use plantvase::app::ports::{ClockPort, EventSink, LinkPort, PumpPort, SensorPort};
use plantvase::app::service::Controller;
use plantvase::config::{ControllerConfig, Delimiter};
use plantvase::error::LinkError;
use plantvase::events::{drain_from, EventQueue};
use plantvase::fsm::context::SensorSample;
use plantvase::link::bridge::LinkBridge;
use plantvase::link::handshake::HandshakeToken;

struct Rig {
    pump: bool,
    temperature_c: f32,
}

impl SensorPort for Rig {
    fn read(&mut self) -> SensorSample {
        SensorSample {
            light: 0.0,
            temperature_c: self.temperature_c,
            moisture_raw: 0.0,
        }
    }
}

impl PumpPort for Rig {
    fn set_pump(&mut self, on: bool) {
        self.pump = on;
    }

    fn is_pump_on(&self) -> bool {
        self.pump
    }
}

impl ClockPort for Rig {
    fn delay_ms(&mut self, _ms: u32) {}
}

struct Wire;

impl LinkPort for Wire {
    fn send(&mut self, record: &str) -> Result<(), LinkError> {
        assert!(!record.is_empty());
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let queue = EventQueue::new();
    let mut bridge = LinkBridge::new(Delimiter::Dollar);
    let mut controller = Controller::new(ControllerConfig::default());
    let mut rig = Rig {
        pump: false,
        temperature_c: 60.0,
    };
    controller.start(&mut Discard);

    for chunk in data.split(|&b| b == b'$') {
        match chunk.first() {
            Some(b'+') => bridge.on_link_state(true, &queue),
            Some(b'-') => bridge.on_link_state(false, &queue),
            Some(&b) => rig.temperature_c = f32::from(b) / 2.0,
            None => {}
        }
        bridge.on_rx(chunk, &queue);
        bridge.on_rx(b"$", &queue);

        drain_from(&queue, |event| {
            controller.handle_event(event, &mut rig, &mut Wire, &mut Discard);
        });
        let _ = controller.tick(&mut rig, &mut Wire, &mut Discard);
        assert!(!rig.pump, "pump left running after a step");
    }

    // Decoding is total.
    for chunk in data.split(|&b| b == b'$') {
        if let Ok(text) = core::str::from_utf8(chunk) {
            let mut record = plantvase::link::framing::Record::new();
            if record.push_str(text).is_ok() {
                let _ = HandshakeToken::decode(&record);
            }
        }
    }
});
