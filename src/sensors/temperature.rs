//! NTC thermistor temperature sensor (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage-divider with a fixed 10 kOhm resistor, read via
//! the ESP32-S3 ADC. The simplified Beta (Steinhart-Hart) equation
//! converts resistance to temperature.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH8 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

/// Reported when the divider reads open or shorted.
pub const FAULT_CELSIUS: f32 = -40.0;

#[derive(Debug, Default)]
pub struct TemperatureSensor;

impl TemperatureSensor {
    pub fn new() -> Self {
        Self
    }

    /// Degrees Celsius.
    pub fn read(&self) -> f32 {
        adc_to_celsius(self.read_adc())
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_TEMP)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TEMP_ADC.load(Ordering::Relaxed)
    }
}

pub fn adc_to_celsius(raw: u16) -> f32 {
    let voltage = (raw as f32 / ADC_MAX) * V_REF;
    if voltage <= 0.01 || voltage >= (V_REF - 0.01) {
        return FAULT_CELSIUS;
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return FAULT_CELSIUS;
    }
    (1.0 / inv_t) - 273.15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_scale_is_room_temperature() {
        let c = adc_to_celsius(2048);
        assert!((c - 25.0).abs() < 0.5, "got {c}");
    }

    #[test]
    fn lower_resistance_reads_warmer() {
        assert!(adc_to_celsius(1000) > adc_to_celsius(3000));
    }

    #[test]
    fn rails_report_fault() {
        assert_eq!(adc_to_celsius(0), FAULT_CELSIUS);
        assert_eq!(adc_to_celsius(4095), FAULT_CELSIUS);
    }
}
