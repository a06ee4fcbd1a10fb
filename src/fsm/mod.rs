//! Door/tray sequencing state machine.
//!
//! Table-driven, one row per decoded [`PodState`]:
//!
//! ```text
//! ┌─────────────┬─────────────────────────┬───────────────┐
//! │ PodState    │ on_open(door_position)  │ on_close      │
//! ├─────────────┼─────────────────────────┼───────────────┤
//! │ Closed      │ DoorOpening             │ AllOff        │
//! │ DoorMidway  │ DoorOpening             │ DoorClosing   │
//! │ DoorOpen    │ TrayOpening if Full     │ DoorClosing   │
//! │ TrayMidway  │ TrayOpening if Full     │ TrayClosing   │
//! │ Open        │ AllOff                  │ TrayClosing   │
//! │ Undefined   │ (hold)                  │ (hold)        │
//! └─────────────┴─────────────────────────┴───────────────┘
//! ```
//!
//! The door always leads on the way out and trails on the way in.  The
//! engine holds no state of its own: everything it needs is supplied by the
//! caller each cycle, so the motor command is a pure function of the
//! decoded switches, the operator target and the stored door position.

pub mod context;
pub mod states;

use core::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::InvalidDoorPosition;

// ---------------------------------------------------------------------------
// Pod state (derived from the limit switches)
// ---------------------------------------------------------------------------

/// Physical state of the pod as decoded from the four limit switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum PodState {
    Closed = 0,
    DoorMidway = 1,
    DoorOpen = 2,
    TrayMidway = 3,
    Open = 4,
    /// Switch combination that matches no defined pattern.
    Undefined = 5,
}

impl PodState {
    /// Total number of states; sizes the step table.
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Closed,
        Self::DoorMidway,
        Self::DoorOpen,
        Self::TrayMidway,
        Self::Open,
        Self::Undefined,
    ];

    /// Canonical label used in logs and status reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::DoorMidway => "DOOR_MIDWAY",
            Self::DoorOpen => "DOOR_OPEN",
            Self::TrayMidway => "TRAY_MIDWAY",
            Self::Open => "OPEN",
            Self::Undefined => "UNDEFINED",
        }
    }

    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl fmt::Display for PodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Operator target
// ---------------------------------------------------------------------------

/// What the operator wants the pod to become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Target {
    Open,
    #[default]
    Closed,
}

impl Target {
    pub const fn from_open_flag(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("OPENING/OPEN"),
            Self::Closed => f.write_str("CLOSING/CLOSED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Motor command
// ---------------------------------------------------------------------------

/// The single motor action asserted for a control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[repr(u8)]
pub enum MotorCommand {
    #[default]
    AllOff = 0,
    DoorOpening = 1,
    TrayOpening = 2,
    TrayClosing = 3,
    DoorClosing = 4,
}

impl MotorCommand {
    /// True if any motor is energised.
    pub const fn is_moving(self) -> bool {
        !matches!(self, Self::AllOff)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::AllOff => "ALL_OFF",
            Self::DoorOpening => "DOOR_OPENING",
            Self::TrayOpening => "TRAY_OPENING",
            Self::TrayClosing => "TRAY_CLOSING",
            Self::DoorClosing => "DOOR_CLOSING",
        }
    }
}

impl fmt::Display for MotorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Door position
// ---------------------------------------------------------------------------

/// Coarse door travel target: half-open or fully open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DoorPosition {
    Half = 50,
    #[default]
    Full = 100,
}

impl DoorPosition {
    pub const fn percent(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DoorPosition {
    type Error = InvalidDoorPosition;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            50 => Ok(Self::Half),
            100 => Ok(Self::Full),
            other => Err(InvalidDoorPosition(other)),
        }
    }
}

impl From<DoorPosition> for u8 {
    fn from(pos: DoorPosition) -> Self {
        pos.percent()
    }
}

impl fmt::Display for DoorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percent())
    }
}

// ---------------------------------------------------------------------------
// Step table
// ---------------------------------------------------------------------------

/// Signature of a single sequencing rule.
/// `None` means "no transition this cycle".
pub type StepFn = fn(DoorPosition) -> Option<MotorCommand>;

/// Static descriptor for one decoded state.
pub struct StepDescriptor {
    pub state: PodState,
    pub name: &'static str,
    pub on_open: StepFn,
    pub on_close: StepFn,
}

/// The sequencing engine.  Owns the step table and nothing else.
pub struct PodSequencer {
    /// Fixed-size table indexed by `PodState as usize`.
    table: [StepDescriptor; PodState::COUNT],
}

impl Default for PodSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PodSequencer {
    pub fn new() -> Self {
        Self {
            table: states::build_step_table(),
        }
    }

    /// Compute the motor command for one cycle.
    ///
    /// Returns `None` when `state` has no rule for `target`
    /// (i.e. `Undefined`): the caller must leave the previous command
    /// asserted and not advance.
    pub fn step(
        &self,
        state: PodState,
        target: Target,
        door_position: DoorPosition,
    ) -> Option<MotorCommand> {
        let row = &self.table[state as usize];
        debug_assert_eq!(row.state, state, "step table out of order");

        let rule = match target {
            Target::Open => row.on_open,
            Target::Closed => row.on_close,
        };
        let command = rule(door_position);

        if command.is_none() {
            debug!("sequencer: {} has no rule, holding", row.name);
        }
        command
    }
}
