//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], the pump, the status LED and the watchdog,
//! exposing them through [`SensorPort`], [`PumpPort`], [`StatusIndicator`]
//! and [`ClockPort`].  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use std::time::Duration;

use crate::app::ports::{ClockPort, PumpPort, SensorPort, StatusIndicator};
use crate::drivers::pump::PumpDriver;
use crate::drivers::status_led::StatusLed;
use crate::drivers::watchdog::Watchdog;
use crate::fsm::context::SensorSample;
use crate::sensors::SensorHub;

/// Longest single sleep between watchdog feeds.
const DELAY_SLICE_MS: u32 = 1_000;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    pump: PumpDriver,
    led: StatusLed,
    watchdog: Watchdog,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, pump: PumpDriver, led: StatusLed, watchdog: Watchdog) -> Self {
        Self {
            sensor_hub,
            pump,
            led,
            watchdog,
        }
    }

    /// Feed the task watchdog.  Called once per control-loop iteration.
    pub fn feed_watchdog(&self) {
        self.watchdog.feed();
    }

    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read(&mut self) -> SensorSample {
        self.sensor_hub.read_all()
    }
}

// ── PumpPort implementation ───────────────────────────────────

impl PumpPort for HardwareAdapter {
    fn set_pump(&mut self, on: bool) {
        if on {
            self.pump.start();
        } else {
            self.pump.stop();
        }
    }

    fn is_pump_on(&self) -> bool {
        self.pump.is_running()
    }
}

// ── StatusIndicator implementation ────────────────────────────

impl StatusIndicator for HardwareAdapter {
    fn show(&mut self, glyph: char) {
        self.led.show_glyph(glyph);
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl ClockPort for HardwareAdapter {
    fn delay_ms(&mut self, ms: u32) {
        let mut remaining = ms;
        while remaining > 0 {
            let slice = remaining.min(DELAY_SLICE_MS);
            std::thread::sleep(Duration::from_millis(u64::from(slice)));
            self.watchdog.feed();
            remaining -= slice;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::hw_init::GpioPin;
    use crate::sensors::light::LightSensor;
    use crate::sensors::moisture::MoistureSensor;
    use crate::sensors::temperature::TemperatureSensor;

    fn adapter() -> HardwareAdapter {
        HardwareAdapter::new(
            SensorHub::new(
                LightSensor::new(),
                TemperatureSensor::new(),
                MoistureSensor::new(GpioPin(6)),
            ),
            PumpDriver::new(GpioPin(1)),
            StatusLed::new(),
            Watchdog::new(),
        )
    }

    #[test]
    fn pump_port_drives_pump() {
        let mut hw = adapter();
        assert!(!hw.is_pump_on());
        hw.set_pump(true);
        assert!(hw.is_pump_on());
        hw.set_pump(false);
        assert!(!hw.is_pump_on());
    }

    #[test]
    fn delay_feeds_watchdog_every_slice() {
        let mut hw = adapter();
        hw.delay_ms(DELAY_SLICE_MS + 5);
        assert_eq!(hw.watchdog().feed_count(), 2);
        hw.delay_ms(0);
        assert_eq!(hw.watchdog().feed_count(), 2);
    }

    #[test]
    fn show_renders_glyph() {
        let mut hw = adapter();
        hw.show('C');
        assert_eq!(hw.led.current_glyph(), Some('C'));
    }
}
