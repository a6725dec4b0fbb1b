//! Water pump driver.
//!
//! A logic-level MOSFET (or relay) switches the pump; the driver only
//! sees an [`OutputPin`].  It is a dumb actuator: the mode machine owns
//! the on/off policy.
//!
//! ## Dual-target design
//!
//! [`GpioPin`] writes through `hw_init::gpio_write`, which is a no-op on
//! the host, so the driver state is the only thing tests observe there.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::drivers::hw_init::GpioPin;

pub struct PumpDriver<P: OutputPin = GpioPin> {
    pin: P,
    running: bool,
}

impl<P: OutputPin> PumpDriver<P> {
    /// Take the pin and force the pump off.
    pub fn new(pin: P) -> Self {
        let mut pump = Self {
            pin,
            running: true,
        };
        pump.stop();
        pump
    }

    pub fn start(&mut self) {
        if let Err(e) = self.pin.set_high() {
            warn!("pump: set_high failed: {:?}", e);
            return;
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if let Err(e) = self.pin.set_low() {
            warn!("pump: set_low failed: {:?}", e);
            return;
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
