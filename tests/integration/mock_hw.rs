//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history
//! without touching real GPIO, ADC or UART.

use std::collections::VecDeque;

use plantvase::app::events::AppEvent;
use plantvase::app::ports::{ClockPort, EventSink, LinkPort, PumpPort, SensorPort, StatusIndicator};
use plantvase::error::LinkError;
use plantvase::events::{push_to, ControlEvent, EventQueue};
use plantvase::fsm::context::SensorSample;

pub fn sample(temperature_c: f32) -> SensorSample {
    SensorSample {
        light: 120.0,
        temperature_c,
        moisture_raw: 512.0,
    }
}

// ── MockBoard ────────────────────────────────────────────────

/// Sensors, pump, status glyph and clock in one recording mock.
pub struct MockBoard<'q> {
    /// Returned by the next reads, oldest first.  The last entry repeats.
    pub samples: VecDeque<SensorSample>,
    pub reads: usize,
    pub pump: bool,
    pub pump_log: Vec<bool>,
    pub glyphs: Vec<char>,
    pub delays: Vec<u32>,
    /// Length of the last delay taken while the pump was on (0 if none).
    pub delayed_with_pump_on: u32,
    inject: Option<(&'q EventQueue, Vec<ControlEvent>)>,
}

#[allow(dead_code)]
impl<'q> MockBoard<'q> {
    pub fn new(first: SensorSample) -> Self {
        Self {
            samples: VecDeque::from([first]),
            reads: 0,
            pump: false,
            pump_log: Vec::new(),
            glyphs: Vec::new(),
            delays: Vec::new(),
            delayed_with_pump_on: 0,
            inject: None,
        }
    }

    pub fn then(mut self, next: SensorSample) -> Self {
        self.samples.push_back(next);
        self
    }

    /// Push `events` into `queue` during the next delay taken with the
    /// pump running, as a producer thread would during a hold.
    pub fn inject_during_hold(&mut self, queue: &'q EventQueue, events: Vec<ControlEvent>) {
        self.inject = Some((queue, events));
    }

    pub fn total_delay_ms(&self) -> u64 {
        self.delays.iter().map(|&d| u64::from(d)).sum()
    }
}

impl SensorPort for MockBoard<'_> {
    fn read(&mut self) -> SensorSample {
        self.reads += 1;
        if self.samples.len() > 1 {
            self.samples.pop_front().unwrap_or_default()
        } else {
            self.samples.front().copied().unwrap_or_default()
        }
    }
}

impl PumpPort for MockBoard<'_> {
    fn set_pump(&mut self, on: bool) {
        self.pump = on;
        self.pump_log.push(on);
    }

    fn is_pump_on(&self) -> bool {
        self.pump
    }
}

impl StatusIndicator for MockBoard<'_> {
    fn show(&mut self, glyph: char) {
        self.glyphs.push(glyph);
    }
}

impl ClockPort for MockBoard<'_> {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        if self.pump {
            self.delayed_with_pump_on = ms;
            if let Some((queue, events)) = self.inject.take() {
                for event in events {
                    push_to(queue, event);
                }
            }
        }
    }
}

// ── MockLink ─────────────────────────────────────────────────

pub struct MockLink {
    pub up: bool,
    pub sent: Vec<String>,
    pub failures: usize,
}

#[allow(dead_code)]
impl MockLink {
    pub fn up() -> Self {
        Self {
            up: true,
            sent: Vec::new(),
            failures: 0,
        }
    }

    pub fn down() -> Self {
        Self {
            up: false,
            ..Self::up()
        }
    }
}

impl LinkPort for MockLink {
    fn send(&mut self, record: &str) -> Result<(), LinkError> {
        if !self.up {
            self.failures += 1;
            return Err(LinkError::NotConnected);
        }
        self.sent.push(record.to_owned());
        Ok(())
    }
}

// ── RecordingSink ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
