//! Concrete sequencing rules and table builder.
//!
//! Each rule is a plain `fn` pointer: no closures or dynamic dispatch,
//! and no heap.
//!
//! ```text
//!  opening:  CLOSED ─▶ DOOR_MIDWAY ─▶ DOOR_OPEN ─[door=100]▶ TRAY_MIDWAY ─▶ OPEN
//!  closing:  OPEN ─▶ TRAY_MIDWAY ─▶ DOOR_OPEN ─▶ DOOR_MIDWAY ─▶ CLOSED
//! ```
//!
//! Closing retracts the tray with no door-position check.  Opening the
//! tray requires the stored door position to be 100.

use super::{DoorPosition, MotorCommand, PodState, StepDescriptor};

/// Build the static step table.  Row order must match `PodState` discriminants.
pub fn build_step_table() -> [StepDescriptor; PodState::COUNT] {
    [
        // Index 0: Closed
        StepDescriptor {
            state: PodState::Closed,
            name: "CLOSED",
            on_open: drive_door_open,
            on_close: stop,
        },
        // Index 1: DoorMidway
        StepDescriptor {
            state: PodState::DoorMidway,
            name: "DOOR_MIDWAY",
            on_open: drive_door_open,
            on_close: drive_door_closed,
        },
        // Index 2: DoorOpen
        StepDescriptor {
            state: PodState::DoorOpen,
            name: "DOOR_OPEN",
            on_open: drive_tray_open_if_door_full,
            on_close: drive_door_closed,
        },
        // Index 3: TrayMidway
        StepDescriptor {
            state: PodState::TrayMidway,
            name: "TRAY_MIDWAY",
            on_open: drive_tray_open_if_door_full,
            on_close: drive_tray_closed,
        },
        // Index 4: Open
        StepDescriptor {
            state: PodState::Open,
            name: "OPEN",
            on_open: stop,
            on_close: drive_tray_closed,
        },
        // Index 5: Undefined
        StepDescriptor {
            state: PodState::Undefined,
            name: "UNDEFINED",
            on_open: hold,
            on_close: hold,
        },
    ]
}

fn drive_door_open(_: DoorPosition) -> Option<MotorCommand> {
    Some(MotorCommand::DoorOpening)
}

fn drive_door_closed(_: DoorPosition) -> Option<MotorCommand> {
    Some(MotorCommand::DoorClosing)
}

fn drive_tray_open_if_door_full(door: DoorPosition) -> Option<MotorCommand> {
    match door {
        DoorPosition::Full => Some(MotorCommand::TrayOpening),
        DoorPosition::Half => Some(MotorCommand::AllOff),
    }
}

fn drive_tray_closed(_: DoorPosition) -> Option<MotorCommand> {
    Some(MotorCommand::TrayClosing)
}

fn stop(_: DoorPosition) -> Option<MotorCommand> {
    Some(MotorCommand::AllOff)
}

fn hold(_: DoorPosition) -> Option<MotorCommand> {
    None
}
