//! Controller state threaded through every mode handler.
//!
//! `FsmContext` is the single struct that handlers read from and write
//! to: timing, configuration, link bookkeeping, the latest sensor
//! sample, and the actions requested during the current step.  There is
//! no ambient global state; the control thread owns exactly one context.

use heapless::Vec;
use serde::Serialize;

use super::Mode;
use crate::config::{ControllerConfig, WateringTrigger};
use crate::link::framing::Record;
use crate::link::handshake::HandshakeToken;

// ---------------------------------------------------------------------------
// Sensor sample (read-only to handlers; written by the sensor port)
// ---------------------------------------------------------------------------

/// A point-in-time reading of every sensor.  Fresh each sampling tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorSample {
    /// Ambient light level (0 – 255).
    pub light: f32,
    /// Air temperature (°C).
    pub temperature_c: f32,
    /// Soil moisture probe reading (0 – 1023).
    pub moisture_raw: f32,
}

// ---------------------------------------------------------------------------
// Link bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkState {
    /// A peer is attached to the serial bridge.
    pub connected: bool,
    /// A connect arrived while busy and is waiting for Monitoring.
    pub pending_registration: bool,
}

// ---------------------------------------------------------------------------
// Actions (written by handlers; executed by the controller)
// ---------------------------------------------------------------------------

/// Conditions that are logged but never halt the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Anomaly {
    /// Unexpected record while Registering.
    Protocol(Record),
    /// Record received while no handshake input was expected.
    SpuriousData(Record),
    /// The peer detached mid-session; the mode was busy.
    LostConnection(Mode),
    /// A watering decision was made with no budget left.
    ReservoirEmpty,
}

/// Side effects requested by a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send one record to the fog node.
    Send(HandshakeToken),
    /// Drive the pump.
    Pump(bool),
    /// Block for `ms`, then feed `Input::HoldElapsed` back to the machine.
    Hold { ms: u32 },
    /// Sleep `ms` before the next tick.
    Sleep { ms: u32 },
    /// Report a non-fatal anomaly.
    Report(Anomaly),
    /// Log the latest sample as a diagnostic snapshot.
    LogSnapshot,
}

/// Upper bound on actions per step (a telemetry burst is four sends plus a sleep).
pub const MAX_ACTIONS: usize = 8;

pub type Actions = Vec<Action, MAX_ACTIONS>;

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler.
pub struct FsmContext {
    // -- Configuration --
    pub config: ControllerConfig,

    // -- Link --
    pub link: LinkState,

    // -- Sensor data --
    /// Latest sample.  Written by the controller before sampling ticks.
    pub sample: Option<SensorSample>,

    // -- Watering --
    /// Water on the next Monitoring tick regardless of the predicate.
    pub force_watering: bool,
    /// Remaining waterings; `None` when the budget is unlimited.
    pub waterings_left: Option<u32>,

    // -- Outputs --
    actions: Actions,
}

impl FsmContext {
    pub fn new(config: ControllerConfig) -> Self {
        let waterings_left = config.watering_budget;
        Self {
            config,
            link: LinkState::default(),
            sample: None,
            force_watering: false,
            waterings_left,
            actions: Vec::new(),
        }
    }

    /// Queue an action for the controller.
    pub fn emit(&mut self, action: Action) {
        if let Err(dropped) = self.actions.push(action) {
            debug_assert!(false, "action buffer overflow: {dropped:?}");
            log::error!("FSM: action buffer full, dropped {:?}", dropped);
        }
    }

    /// Take the actions queued during this step.
    pub fn take_actions(&mut self) -> Actions {
        core::mem::take(&mut self.actions)
    }

    /// Whether the latest sample calls for water.
    pub fn needs_water(&self) -> bool {
        let Some(sample) = self.sample else {
            return false;
        };
        let reading = match self.config.watering_trigger {
            WateringTrigger::Temperature => sample.temperature_c,
            WateringTrigger::Moisture => sample.moisture_raw,
        };
        reading < self.config.moisture_threshold
    }

    /// Whether another watering is allowed by the reservoir budget.
    pub fn has_water(&self) -> bool {
        self.waterings_left != Some(0)
    }

    /// Restore the budget after a refill.
    pub fn refill(&mut self) {
        self.waterings_left = self.config.watering_budget;
    }
}
