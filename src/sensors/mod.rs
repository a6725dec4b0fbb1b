//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSample`] on
//! each sampling step.

pub mod light;
pub mod moisture;
pub mod temperature;

use embedded_hal::digital::OutputPin;

use crate::drivers::hw_init::GpioPin;
use crate::fsm::context::SensorSample;
use light::LightSensor;
use moisture::MoistureSensor;
use temperature::TemperatureSensor;

/// Aggregates all sensor drivers and produces a unified sample.
pub struct SensorHub<P: OutputPin = GpioPin> {
    pub light: LightSensor,
    pub temperature: TemperatureSensor,
    pub moisture: MoistureSensor<P>,
}

impl<P: OutputPin> SensorHub<P> {
    /// Construct a new hub from pre-built drivers.
    pub fn new(light: LightSensor, temperature: TemperatureSensor, moisture: MoistureSensor<P>) -> Self {
        Self {
            light,
            temperature,
            moisture,
        }
    }

    /// Read every sensor.
    pub fn read_all(&mut self) -> SensorSample {
        SensorSample {
            light: self.light.read(),
            temperature_c: self.temperature.read(),
            moisture_raw: self.moisture.read(),
        }
    }
}
