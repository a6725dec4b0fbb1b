//! PlantVase firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! adapters the binary wires together. All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod io_task;
pub mod link;
pub mod pins;

pub mod adapters;
pub mod drivers;
pub mod sensors;

// Host tests need a critical-section implementation for the embassy channels.
#[cfg(test)]
use critical_section as _;
