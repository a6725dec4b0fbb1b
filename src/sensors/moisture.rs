//! Resistive soil-moisture probe.
//!
//! The probe is only powered while sampling: the excitation pin goes
//! high, the ADC is read after a short settle, then the pin goes low.
//! Readings are reported on a 10-bit scale (0–1023); higher is wetter.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use embedded_hal::digital::OutputPin;
use log::warn;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::drivers::hw_init::GpioPin;

#[cfg(target_os = "espidf")]
const PROBE_SETTLE_US: u32 = 200;

#[cfg(not(target_os = "espidf"))]
static SIM_MOISTURE_ADC: AtomicU16 = AtomicU16::new(2000);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_moisture_adc(raw: u16) {
    SIM_MOISTURE_ADC.store(raw, Ordering::Relaxed);
}

pub struct MoistureSensor<P: OutputPin = GpioPin> {
    excite: P,
}

impl<P: OutputPin> MoistureSensor<P> {
    pub fn new(excite: P) -> Self {
        Self { excite }
    }

    /// Excite, read, release.  The probe is left unpowered even when the
    /// excitation pin fails.
    pub fn read(&mut self) -> f32 {
        if let Err(e) = self.excite.set_high() {
            warn!("moisture: excite failed: {:?}", e);
        }
        Self::settle();
        let raw = self.read_adc();
        if let Err(e) = self.excite.set_low() {
            warn!("moisture: release failed: {:?}", e);
        }
        scale_to_10bit(raw)
    }

    #[cfg(target_os = "espidf")]
    fn settle() {
        esp_idf_hal::delay::Ets::delay_us(PROBE_SETTLE_US);
    }

    #[cfg(not(target_os = "espidf"))]
    fn settle() {}

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_MOISTURE)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_MOISTURE_ADC.load(Ordering::Relaxed)
    }
}

/// 12-bit ADC count to 0–1023.
pub fn scale_to_10bit(raw: u16) -> f32 {
    f32::from(raw.min(4095) >> 2)
}
