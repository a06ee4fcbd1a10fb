//! Door and tray motor driver (two H-bridge enable/direction pairs).
//!
//! ## Pin mapping
//!
//! | Command       | door EN | door DIR | tray EN | tray DIR |
//! |---------------|---------|----------|---------|----------|
//! | `AllOff`      | LOW     | –        | LOW     | –        |
//! | `DoorOpening` | HIGH    | HIGH     | LOW     | –        |
//! | `DoorClosing` | HIGH    | LOW      | LOW     | –        |
//! | `TrayOpening` | LOW     | –        | HIGH    | LOW      |
//! | `TrayClosing` | LOW     | –        | HIGH    | HIGH     |
//!
//! At most one enable is ever HIGH.  The idle motor is disabled before the
//! active one's direction is set, and direction is always set before its
//! enable goes HIGH.
//!
//! ## Safety contract
//!
//! This driver is a dumb actuator.  Whether a command may run at all is
//! decided by the interlock upstream.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::ActuatorError;
use crate::fsm::MotorCommand;

pub struct PodMotors<O> {
    door_enable: O,
    door_dir: O,
    tray_enable: O,
    tray_dir: O,
    active: MotorCommand,
}

impl<O: OutputPin> PodMotors<O> {
    pub fn new(door_enable: O, door_dir: O, tray_enable: O, tray_dir: O) -> Self {
        Self {
            door_enable,
            door_dir,
            tray_enable,
            tray_dir,
            active: MotorCommand::AllOff,
        }
    }

    /// Drive the pins for `command`.
    pub fn apply(&mut self, command: MotorCommand) -> Result<(), ActuatorError> {
        match command {
            MotorCommand::AllOff => return self.stop_all(),
            MotorCommand::DoorOpening | MotorCommand::DoorClosing => {
                set(&mut self.tray_enable, PinState::Low)?;
                let dir = PinState::from(command == MotorCommand::DoorOpening);
                set(&mut self.door_dir, dir)?;
                set(&mut self.door_enable, PinState::High)?;
            }
            MotorCommand::TrayOpening | MotorCommand::TrayClosing => {
                set(&mut self.door_enable, PinState::Low)?;
                let dir = PinState::from(command == MotorCommand::TrayClosing);
                set(&mut self.tray_dir, dir)?;
                set(&mut self.tray_enable, PinState::High)?;
            }
        }
        self.active = command;
        Ok(())
    }

    /// Disable both motors.  Tries both enables even if the first fails.
    pub fn stop_all(&mut self) -> Result<(), ActuatorError> {
        let door = set(&mut self.door_enable, PinState::Low);
        let tray = set(&mut self.tray_enable, PinState::Low);
        self.active = MotorCommand::AllOff;
        door.and(tray)
    }

    /// Last command successfully applied.
    pub fn active(&self) -> MotorCommand {
        self.active
    }
}

fn set<O: OutputPin>(pin: &mut O, state: PinState) -> Result<(), ActuatorError> {
    pin.set_state(state).map_err(|_| ActuatorError::GpioWriteFailed)
}
