//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements                    | Connects to              |
//! |------------------|-------------------------------|--------------------------|
//! | `hardware`       | SensorPort, PumpPort          | ESP32 ADC, GPIO          |
//! |                  | StatusIndicator, ClockPort    | LEDC, FreeRTOS delay     |
//! | `log_sink`       | EventSink                     | Serial log output        |
//! | `time`           | -                             | ESP32 system timer       |
//! | `uart_transport` | Transport                     | BLE-UART bridge (UART1)  |
//!
//! The `LinkPort` adapter (`QueuedLink`) lives with the I/O task it feeds.

pub mod hardware;
pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart_transport;
