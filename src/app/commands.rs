//! Inbound commands to the pod service.
//!
//! These represent requests from the outside world (door button, BLE
//! write, Wi-Fi command) that the [`PodService`](super::service::PodService)
//! applies at the start of the next control cycle.  Producers never touch
//! the service's state directly.

use crate::fsm::Target;

/// Commands that external adapters can send into the pod core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodCommand {
    /// Set the operator target outright (remote open / close).
    SetTarget(Target),

    /// Flip the operator target (physical button press).  Ignored while
    /// the child lock is on.
    ToggleTarget,

    /// Request a door travel target.  Only 50 and 100 are accepted.
    SetDoorPosition(u8),

    /// Enable or disable the child lock.
    SetChildLock(bool),
}

impl PodCommand {
    const TAG_TARGET: u16 = 0x01;
    const TAG_TOGGLE: u16 = 0x02;
    const TAG_DOOR: u16 = 0x03;
    const TAG_CHILD_LOCK: u16 = 0x04;

    /// Pack into a 16-bit word for the lock-free request queue:
    /// high byte = tag, low byte = argument.
    pub const fn to_word(self) -> u16 {
        match self {
            Self::SetTarget(t) => (Self::TAG_TARGET << 8) | t.is_open() as u16,
            Self::ToggleTarget => Self::TAG_TOGGLE << 8,
            Self::SetDoorPosition(raw) => (Self::TAG_DOOR << 8) | raw as u16,
            Self::SetChildLock(on) => (Self::TAG_CHILD_LOCK << 8) | on as u16,
        }
    }

    /// Inverse of [`to_word`](Self::to_word).  Unknown tags yield `None`.
    pub const fn from_word(word: u16) -> Option<Self> {
        let arg = (word & 0xFF) as u8;
        match word >> 8 {
            Self::TAG_TARGET => Some(Self::SetTarget(Target::from_open_flag(arg != 0))),
            Self::TAG_TOGGLE => Some(Self::ToggleTarget),
            Self::TAG_DOOR => Some(Self::SetDoorPosition(arg)),
            Self::TAG_CHILD_LOCK => Some(Self::SetChildLock(arg != 0)),
            _ => None,
        }
    }
}
