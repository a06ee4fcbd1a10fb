//! Port traits: the hexagonal boundary between the pod core and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PodService (domain)
//! ```
//!
//! Driven adapters (switches + stall sense, motor driver, event sinks,
//! settings storage) implement these traits.  The
//! [`PodService`](super::service::PodService) consumes them via generics,
//! so the domain core never touches a pin directly.

use crate::fsm::{DoorPosition, MotorCommand};
use crate::sensors::limit_switches::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port.
pub trait SensorPort {
    /// Sample the four limit switches.  Implementations that fail to read
    /// return an all-inactive reading, which decodes to `Undefined`.
    fn read_switches(&mut self) -> SensorReading;

    /// One raw sample from the stall-sense ADC channel.  A failed
    /// conversion reads as 0.
    fn read_stall_sense_raw(&mut self) -> u16;

    /// Failed stall-sense conversions since boot.
    fn stall_sense_failures(&self) -> u32 {
        0
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the motor driver.
pub trait ActuatorPort {
    /// Assert exactly one motor action; the other motor is disabled.
    fn drive(&mut self, command: MotorCommand);

    /// Disable both motors.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`PodEvent`](super::events::PodEvent)s
/// through this port.  Adapters decide where they go (serial log, BLE
/// characteristic, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PodEvent);
}

// ───────────────────────────────────────────────────────────────
// Settings port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent storage for the door-position setting.
///
/// Load returns the raw stored byte so the service can reject (and log)
/// out-of-range values instead of the adapter silently mapping them.
pub trait SettingsPort {
    /// `Ok(None)` when nothing has been stored yet (first boot).
    fn load_door_position(&self) -> Result<Option<u8>, StorageError>;

    fn save_door_position(&mut self, position: DoorPosition) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SettingsPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Storage partition could not be opened.
    Unavailable,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for StorageError {}
