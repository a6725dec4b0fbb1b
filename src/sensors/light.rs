//! Light-dependent resistor on ADC1_CH3.
//!
//! Reported on an 8-bit scale (0 = dark, 255 = full sun).

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_LIGHT_ADC: AtomicU16 = AtomicU16::new(1600);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_light_adc(raw: u16) {
    SIM_LIGHT_ADC.store(raw, Ordering::Relaxed);
}

#[derive(Debug, Default)]
pub struct LightSensor;

impl LightSensor {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self) -> f32 {
        scale_to_8bit(self.read_adc())
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_LIGHT)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_LIGHT_ADC.load(Ordering::Relaxed)
    }
}

/// 12-bit ADC count to 0–255.
pub fn scale_to_8bit(raw: u16) -> f32 {
    f32::from(raw.min(4095) >> 4)
}
