//! Control context owned by the pod service.
//!
//! `PodContext` replaces the free-standing globals of a classic firmware
//! loop (target flag, door position, last command).  It is owned by
//! [`PodService`](crate::app::service::PodService) and mutated only from the
//! control cycle; collaborators read it through the service's accessors and
//! request changes through its setters.

use log::{info, warn};

use super::{DoorPosition, MotorCommand, PodState, Target};
use crate::config::PodConfig;
use crate::sensors::limit_switches::SensorReading;

/// The single-writer control state.
pub struct PodContext {
    // -- Inputs --
    /// Raw switch levels from the most recent control cycle.
    pub(crate) reading: SensorReading,
    /// Operator intent.
    pub(crate) target: Target,
    /// Stored travel target for the door.
    pub(crate) door_position: DoorPosition,
    /// Physical button disabled.
    pub(crate) child_lock: bool,

    // -- Derived --
    /// State decoded from `reading`.
    pub(crate) state: PodState,
    /// Command currently asserted on the motors.
    pub(crate) command: MotorCommand,

    // -- Bookkeeping --
    pub(crate) cycles: u64,
    pub(crate) config: PodConfig,
}

impl PodContext {
    pub fn new(config: PodConfig) -> Self {
        Self {
            reading: SensorReading::default(),
            target: Target::Closed,
            door_position: config.default_door_position,
            child_lock: false,
            state: PodState::Undefined,
            command: MotorCommand::AllOff,
            cycles: 0,
            config,
        }
    }

    /// Accept `requested` if it is 50 or 100; otherwise keep the prior value.
    /// Returns `true` if the request was accepted.
    pub fn set_door_position(&mut self, requested: u8) -> bool {
        match DoorPosition::try_from(requested) {
            Ok(pos) => {
                self.door_position = pos;
                info!("door position set to {}", pos);
                true
            }
            Err(e) => {
                warn!("{}; keeping {}", e, self.door_position);
                false
            }
        }
    }
}
