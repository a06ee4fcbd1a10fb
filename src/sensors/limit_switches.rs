//! Door and tray limit switches.
//!
//! Four mechanical switches, each wired to a GPIO configured as a pull-up
//! input.  A switch pulls its line LOW when the assembly reaches that end
//! position, so "activated" means the pin reads low.
//!
//! ```text
//! door_closed door_opened tray_closed tray_opened │ PodState
//! ────────────────────────────────────────────────┼────────────
//!      T           F           T           F      │ Closed
//!      F           F           T           F      │ DoorMidway
//!      F           T           T           F      │ DoorOpen
//!      F           T           F           F      │ TrayMidway
//!      F           T           F           T      │ Open
//!            anything else                        │ Undefined
//! ```

use embedded_hal::digital::InputPin;
use serde::Serialize;

use crate::error::SensorError;
use crate::fsm::PodState;

/// One sample of all four switches.  `true` = switch activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SensorReading {
    pub door_closed: bool,
    pub door_opened: bool,
    pub tray_closed: bool,
    pub tray_opened: bool,
}

impl SensorReading {
    pub const fn new(door_closed: bool, door_opened: bool, tray_closed: bool, tray_opened: bool) -> Self {
        Self {
            door_closed,
            door_opened,
            tray_closed,
            tray_opened,
        }
    }

    /// Build a reading from the low four bits of `bits`
    /// (bit 0 = door_closed … bit 3 = tray_opened).
    pub const fn from_bits(bits: u8) -> Self {
        Self::new(bits & 0b0001 != 0, bits & 0b0010 != 0, bits & 0b0100 != 0, bits & 0b1000 != 0)
    }
}

/// Map a switch reading to exactly one [`PodState`].
///
/// Pure: no side effects, no hidden state.  Combinations outside the table
/// (including physically contradictory ones) decode to `Undefined`.
pub const fn decode(r: SensorReading) -> PodState {
    match (r.door_closed, r.door_opened, r.tray_closed, r.tray_opened) {
        (true, false, true, false) => PodState::Closed,
        (false, false, true, false) => PodState::DoorMidway,
        (false, true, true, false) => PodState::DoorOpen,
        (false, true, false, false) => PodState::TrayMidway,
        (false, true, false, true) => PodState::Open,
        _ => PodState::Undefined,
    }
}

// ---------------------------------------------------------------------------
// Pin reader
// ---------------------------------------------------------------------------

/// The four switch inputs.
pub struct LimitSwitches<P> {
    door_closed: P,
    door_opened: P,
    tray_closed: P,
    tray_opened: P,
}

impl<P: InputPin> LimitSwitches<P> {
    pub fn new(door_closed: P, door_opened: P, tray_closed: P, tray_opened: P) -> Self {
        Self {
            door_closed,
            door_opened,
            tray_closed,
            tray_opened,
        }
    }

    /// Sample all four switches.
    pub fn read(&mut self) -> Result<SensorReading, SensorError> {
        Ok(SensorReading {
            door_closed: is_activated(&mut self.door_closed)?,
            door_opened: is_activated(&mut self.door_opened)?,
            tray_closed: is_activated(&mut self.tray_closed)?,
            tray_opened: is_activated(&mut self.tray_opened)?,
        })
    }
}

/// Active-low: pull-up biased, switch closes to ground.
fn is_activated<P: InputPin>(pin: &mut P) -> Result<bool, SensorError> {
    pin.is_low().map_err(|_| SensorError::GpioReadFailed)
}
