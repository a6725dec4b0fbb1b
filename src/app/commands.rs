//! Inbound commands to the controller.
//!
//! These represent actions requested by the person tending the plant
//! (button gestures) that the [`Controller`](super::service::Controller)
//! interprets between control steps.

/// Commands that local adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Water on the next Monitoring tick regardless of the predicate.
    WaterNow,

    /// Log the latest sensor sample as a JSON snapshot.
    LogSnapshot,

    /// The reservoir was refilled; restore the watering budget.
    ReservoirRefilled,
}
