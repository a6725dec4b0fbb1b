//! GPIO / peripheral pin assignments for the PlantVase board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Water pump (logic-level MOSFET, active HIGH)
// ---------------------------------------------------------------------------

pub const PUMP_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// Light-dependent resistor divider.  ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const LIGHT_ADC_GPIO: i32 = 4;

/// NTC thermistor: 10 kΩ @ 25 °C, voltage-divider to ADC.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 9;

/// Resistive soil-moisture probe.  ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const MOISTURE_ADC_GPIO: i32 = 5;

/// Drives the moisture probe only while sampling, to slow electrode
/// corrosion.
pub const MOISTURE_EXCITE_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Status LED (discrete RGB)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Serial link to the BLE-UART bridge module
// ---------------------------------------------------------------------------

pub const LINK_UART_TX_GPIO: i32 = 17;
pub const LINK_UART_RX_GPIO: i32 = 18;
/// Bridge STATE output: HIGH while a central is connected.
pub const LINK_STATE_GPIO: i32 = 7;
pub const LINK_UART_BAUD: u32 = 9_600;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// User button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: water now / snapshot / reservoir refilled.
pub const BUTTON_GPIO: i32 = 16;
