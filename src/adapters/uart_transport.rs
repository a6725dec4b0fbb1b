//! UART transport to a BLE-UART bridge module (HM-10 class).
//!
//! The module forwards bytes between the serial port and the BLE
//! central; its STATE pin is high while a central is attached, which is
//! what the I/O task reports as the peer connection.

use esp_idf_svc::hal::uart::UartDriver;
use esp_idf_svc::sys::EspError;

use crate::drivers::hw_init;
use crate::link::transport::Transport;

/// Ticks to wait for the TX FIFO to drain on flush.
const TX_DONE_TIMEOUT_TICKS: u32 = 1_000;

pub struct UartTransport {
    uart: UartDriver<'static>,
    state_gpio: i32,
}

impl UartTransport {
    pub fn new(uart: UartDriver<'static>, state_gpio: i32) -> Self {
        Self { uart, state_gpio }
    }
}

impl Transport for UartTransport {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        // Zero timeout: never block the I/O executor.
        self.uart.read(buf, 0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart.wait_tx_done(TX_DONE_TIMEOUT_TICKS)
    }

    fn peer_connected(&self) -> bool {
        hw_init::gpio_read(self.state_gpio)
    }
}
