//! PlantVase Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink      QueuedLink         │
//! │  (Sensor+Pump+LED+Clock)  (EventSink)       (LinkPort)         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │         ControlLoop · Controller (pure logic)          │    │
//! │  │              Fsm · FsmContext · handshake              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  I/O task (core 0): UartTransport · LinkBridge · button        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::gpio::AnyIOPin;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use log::{error, info, warn};

use plantvase::adapters::hardware::HardwareAdapter;
use plantvase::adapters::log_sink::LogEventSink;
use plantvase::adapters::uart_transport::UartTransport;
use plantvase::app::control_loop::ControlLoop;
use plantvase::app::service::Controller;
use plantvase::config::ControllerConfig;
use plantvase::drivers::button::ButtonDriver;
use plantvase::drivers::hw_init::{self, GpioPin};
use plantvase::drivers::pump::PumpDriver;
use plantvase::drivers::status_led::StatusLed;
use plantvase::drivers::watchdog::Watchdog;
use plantvase::error::Error;
use plantvase::events::EVENT_QUEUE;
use plantvase::io_task::{self, QueuedLink};
use plantvase::pins;
use plantvase::sensors::light::LightSensor;
use plantvase::sensors::moisture::MoistureSensor;
use plantvase::sensors::temperature::TemperatureSensor;
use plantvase::sensors::SensorHub;

/// Build-time JSON override for [`ControllerConfig`].
const CONFIG_OVERRIDE: Option<&str> = option_env!("PLANTVASE_CONFIG");

fn load_config() -> ControllerConfig {
    match ControllerConfig::load(CONFIG_OVERRIDE) {
        Ok(config) => {
            if CONFIG_OVERRIDE.is_some() {
                info!("Config: build-time override applied");
            }
            config
        }
        Err(e) => {
            warn!("Config: override rejected ({}), using defaults", e);
            ControllerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("PlantVase v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical: log and halt.
        // The task watchdog resets the chip.
        error!("{} ({}), halting", Error::Init("peripherals"), e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {}, button disabled", e);
    }

    let config = load_config();
    info!(
        "Config: identity='{}' delimiter='{}' trigger={:?} threshold={} pump={}ms",
        config.identity,
        config.delimiter.as_char().escape_default(),
        config.watering_trigger,
        config.moisture_threshold,
        config.pump_duration_ms
    );

    // ── 3. Serial link + I/O task ─────────────────────────────
    let peripherals = Peripherals::take()?;
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(pins::LINK_UART_BAUD)),
    )?;
    let transport = UartTransport::new(uart, pins::LINK_STATE_GPIO);
    let _io = io_task::spawn(
        transport,
        config.delimiter,
        ButtonDriver::new(pins::BUTTON_GPIO),
    )?;

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(
        SensorHub::new(
            LightSensor::new(),
            TemperatureSensor::new(),
            MoistureSensor::new(GpioPin(pins::MOISTURE_EXCITE_GPIO)),
        ),
        PumpDriver::new(GpioPin(pins::PUMP_GPIO)),
        StatusLed::new(),
        Watchdog::new(),
    );
    let mut link = QueuedLink::new(config.delimiter);
    let mut sink = LogEventSink::new();

    // ── 5. Control loop ───────────────────────────────────────
    let mut controller = Controller::new(config);
    controller.start(&mut sink);
    let mut control = ControlLoop::new(controller);

    info!("System ready. Entering control loop.");
    loop {
        control.run_once(&EVENT_QUEUE, &mut hw, &mut link, &mut sink);
        hw.feed_watchdog();
    }
}
