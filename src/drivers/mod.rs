//! Actuator drivers, input debouncing, and peripheral helpers.

pub mod button;
pub mod hw_init;
pub mod motor;
