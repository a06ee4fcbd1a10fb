//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the motor driver, exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  This is the only module in the
//! system that touches actual hardware.  Generic over the embedded-hal pin
//! types, so `PinDriver`s on target and fake pins on the host both fit.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{error, warn};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::motor::PodMotors;
use crate::fsm::MotorCommand;
use crate::sensors::SensorHub;
use crate::sensors::limit_switches::SensorReading;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I, O> {
    sensor_hub: SensorHub<I>,
    motors: PodMotors<O>,
}

impl<I: InputPin, O: OutputPin> HardwareAdapter<I, O> {
    pub fn new(sensor_hub: SensorHub<I>, motors: PodMotors<O>) -> Self {
        Self { sensor_hub, motors }
    }

    pub fn active_command(&self) -> MotorCommand {
        self.motors.active()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I: InputPin, O: OutputPin> SensorPort for HardwareAdapter<I, O> {
    fn read_switches(&mut self) -> SensorReading {
        self.sensor_hub.read_switches()
    }

    fn read_stall_sense_raw(&mut self) -> u16 {
        self.sensor_hub.read_stall_raw()
    }

    fn stall_sense_failures(&self) -> u32 {
        self.sensor_hub.stall_failures()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I: InputPin, O: OutputPin> ActuatorPort for HardwareAdapter<I, O> {
    fn drive(&mut self, command: MotorCommand) {
        if let Err(e) = self.motors.apply(command) {
            warn!("motor {} failed: {}; stopping both motors", command, e);
            self.all_off();
        }
    }

    fn all_off(&mut self) {
        if let Err(e) = self.motors.stop_all() {
            error!("motor stop failed: {}", e);
        }
    }
}
