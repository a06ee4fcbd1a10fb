//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the rules of the sole pod: decoding switch state,
//! sequencing door and tray motion, and gating it all behind the stall
//! interlock.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
