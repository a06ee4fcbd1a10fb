//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO.  A crude mechanical model moves
//! the limit switches one stage per [`MockHardware::advance`] in the
//! direction of the active motor, which lets scenarios run a pod from
//! closed to open and back.

use solepod::app::events::PodEvent;
use solepod::app::ports::{ActuatorPort, EventSink, SensorPort, SettingsPort, StorageError};
use solepod::fsm::{DoorPosition, MotorCommand, PodState};
use solepod::sensors::limit_switches::{SensorReading, decode};

/// 12-bit raw value for a stall-sense voltage at the default 3.3 V reference.
pub fn raw_for_volts(volts: f32) -> u16 {
    (volts / 3.3 * 4095.0).round() as u16
}

/// Switch levels that decode to `state`.  `Undefined` uses all-active.
pub fn reading_for(state: PodState) -> SensorReading {
    match state {
        PodState::Closed => SensorReading::new(true, false, true, false),
        PodState::DoorMidway => SensorReading::new(false, false, true, false),
        PodState::DoorOpen => SensorReading::new(false, true, true, false),
        PodState::TrayMidway => SensorReading::new(false, true, false, false),
        PodState::Open => SensorReading::new(false, true, false, true),
        PodState::Undefined => SensorReading::new(true, true, true, true),
    }
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Drive(MotorCommand),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub reading: SensorReading,
    pub stall_raw: u16,
    pub adc_reads: u32,
    /// Reported through `stall_sense_failures`.
    pub sense_failures: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::at(PodState::Closed)
    }

    pub fn at(state: PodState) -> Self {
        Self {
            calls: Vec::new(),
            reading: reading_for(state),
            stall_raw: raw_for_volts(0.02),
            adc_reads: 0,
            sense_failures: 0,
        }
    }

    pub fn set_state(&mut self, state: PodState) {
        self.reading = reading_for(state);
    }

    pub fn last_call(&self) -> Option<ActuatorCall> {
        self.calls.last().copied()
    }

    /// What the motors are doing right now.
    pub fn active(&self) -> MotorCommand {
        match self.last_call() {
            Some(ActuatorCall::Drive(cmd)) => cmd,
            Some(ActuatorCall::AllOff) | None => MotorCommand::AllOff,
        }
    }

    pub fn drive_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Drive(_)))
            .count()
    }

    pub fn ever_drove(&self, cmd: MotorCommand) -> bool {
        self.calls.contains(&ActuatorCall::Drive(cmd))
    }

    /// Move the mechanism one stage under the active motor.
    pub fn advance(&mut self) {
        let next = match (decode(self.reading), self.active()) {
            (PodState::Closed, MotorCommand::DoorOpening) => PodState::DoorMidway,
            (PodState::DoorMidway, MotorCommand::DoorOpening) => PodState::DoorOpen,
            (PodState::DoorOpen, MotorCommand::TrayOpening) => PodState::TrayMidway,
            (PodState::TrayMidway, MotorCommand::TrayOpening) => PodState::Open,
            (PodState::Open, MotorCommand::TrayClosing) => PodState::TrayMidway,
            (PodState::TrayMidway, MotorCommand::TrayClosing) => PodState::DoorOpen,
            (PodState::DoorOpen, MotorCommand::DoorClosing) => PodState::DoorMidway,
            (PodState::DoorMidway, MotorCommand::DoorClosing) => PodState::Closed,
            _ => return,
        };
        self.set_state(next);
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_switches(&mut self) -> SensorReading {
        self.reading
    }

    fn read_stall_sense_raw(&mut self) -> u16 {
        self.adc_reads += 1;
        self.stall_raw
    }

    fn stall_sense_failures(&self) -> u32 {
        self.sense_failures
    }
}

impl ActuatorPort for MockHardware {
    fn drive(&mut self, command: MotorCommand) {
        self.calls.push(ActuatorCall::Drive(command));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockSettings ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockSettings {
    pub stored: Option<u8>,
    pub fail_load: bool,
    pub fail_save: bool,
    pub saves: u32,
}

#[allow(dead_code)]
impl MockSettings {
    pub fn with(raw: u8) -> Self {
        Self {
            stored: Some(raw),
            ..Default::default()
        }
    }
}

impl SettingsPort for MockSettings {
    fn load_door_position(&self) -> Result<Option<u8>, StorageError> {
        if self.fail_load {
            return Err(StorageError::IoError);
        }
        Ok(self.stored)
    }

    fn save_door_position(&mut self, position: DoorPosition) -> Result<(), StorageError> {
        if self.fail_save {
            return Err(StorageError::Full);
        }
        self.stored = Some(position.percent());
        self.saves += 1;
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<PodEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&PodEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// `to` side of every `CommandChanged`, in order.
    pub fn command_trail(&self) -> Vec<MotorCommand> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PodEvent::CommandChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PodEvent) {
        self.events.push(*event);
    }
}
