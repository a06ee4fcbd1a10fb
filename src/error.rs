//! Error types for the SolePod firmware.
//!
//! Pin-level failures ([`SensorError`], [`ActuatorError`]) never leave the
//! hardware layer: the adapters log them and degrade to a safe reading or an
//! all-off.  The crate `Error` covers what can fail at the service boundary.
//! All types are `Copy` so they can be passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Failure surfaced by [`PodService`](crate::app::service::PodService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read of a limit switch or the door button returned an error.
    GpioReadFailed,
    /// A stall-sense ADC conversion failed (ESP-IDF return code).
    AdcReadFailed(i32),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::AdcReadFailed(rc) => write!(f, "ADC read failed (rc={rc})"),
        }
    }
}

impl core::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Setting a motor enable or direction pin failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl core::error::Error for ActuatorError {}

// ---------------------------------------------------------------------------
// Door position
// ---------------------------------------------------------------------------

/// A door-position request that is not one of the two travel targets.
/// Carries the rejected raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDoorPosition(pub u8);

impl fmt::Display for InvalidDoorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid door position (50 or 100)", self.0)
    }
}

impl core::error::Error for InvalidDoorPosition {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
