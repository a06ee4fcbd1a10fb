//! Outbound pod events.
//!
//! The [`PodService`](super::service::PodService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: print to serial, notify a BLE client, etc.

use serde::Serialize;

use crate::fsm::{DoorPosition, MotorCommand, PodState, Target};
use crate::safety::SafetyStatus;
use crate::sensors::limit_switches::SensorReading;

/// Structured events emitted by the pod core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PodEvent {
    /// The service has started (carries the decoded boot state).
    Started {
        state: PodState,
        door_position: DoorPosition,
    },

    /// The decoded switch state changed.
    StateChanged { from: PodState, to: PodState },

    /// A different motor command was asserted.
    CommandChanged { from: MotorCommand, to: MotorCommand },

    /// The operator target changed.
    TargetChanged(Target),

    /// A door-position request was accepted.
    DoorPositionChanged(DoorPosition),

    /// A door-position request outside {50, 100} was ignored.
    DoorPositionRejected(u8),

    ChildLockChanged(bool),

    /// The stall interlock latched.  Emitted once per boot at most.
    SystemLocked { status: SafetyStatus, voltage: f32 },

    /// Periodic status snapshot.
    Status(StatusReport),
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    pub state: PodState,
    pub target: Target,
    pub command: MotorCommand,
    pub door_position: DoorPosition,
    pub child_lock: bool,
    pub safety_status: SafetyStatus,
    pub locked: bool,
    /// Stall-sense voltage from the latest check (V).
    pub stall_voltage: f32,
    pub stall_threshold: f32,
    /// Failed stall-sense conversions since boot.
    pub stall_sense_failures: u32,
    pub sensors: SensorReading,
}
