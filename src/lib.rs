//! SolePod firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod safety;
pub mod scheduler;

pub mod pins;

// Hardware-facing modules; the ESP-IDF paths inside are cfg-gated and the
// host builds use simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod sensors;
