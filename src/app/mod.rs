//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the PlantVase controller:
//! mode orchestration, the pairing handshake and the cooperative loop.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod control_loop;
pub mod events;
pub mod ports;
pub mod service;
