//! Pod service: the hexagonal core.
//!
//! [`PodService`] owns the sequencer, the stall interlock and the control
//! context.  All I/O flows through port traits injected at call sites, so
//! the whole service runs against mock adapters on the host.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         PodService          │
//! ActuatorPort ◀──│Decode · Sequence · Interlock│ ◀─▶ SettingsPort
//!                 └─────────────────────────────┘
//! ```
//!
//! Two entry points are driven by the scheduler at independent cadences:
//! [`safety_tick`](PodService::safety_tick) (stall check) and
//! [`tick`](PodService::tick) (decode → sequence → drive).  The control
//! tick always applies the latched safety verdict before any sequencer
//! output can reach the motors; only sequencing is gated, decoding is not.

use log::{debug, info, warn};

use crate::config::PodConfig;
use crate::error::Result;
use crate::fsm::context::PodContext;
use crate::fsm::{DoorPosition, MotorCommand, PodSequencer, PodState, Target};
use crate::safety::{SafetyInterlock, SafetyStatus};
use crate::sensors::limit_switches::decode;

use super::commands::PodCommand;
use super::events::{PodEvent, StatusReport};
use super::ports::{ActuatorPort, EventSink, SensorPort, SettingsPort};

// ───────────────────────────────────────────────────────────────
// PodService
// ───────────────────────────────────────────────────────────────

pub struct PodService {
    ctx: PodContext,
    sequencer: PodSequencer,
    interlock: SafetyInterlock,
    /// Door position changed since the last successful save.
    settings_dirty: bool,
}

impl PodService {
    /// Construct the service.  Rejects an invalid configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: PodConfig) -> Result<Self> {
        config.validate()?;
        let interlock = SafetyInterlock::new(&config);
        Ok(Self {
            ctx: PodContext::new(config),
            sequencer: PodSequencer::new(),
            interlock,
            settings_dirty: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Stop both motors and decode the boot state.
    pub fn start(&mut self, hw: &mut (impl SensorPort + ActuatorPort), sink: &mut impl EventSink) {
        hw.all_off();
        self.ctx.command = MotorCommand::AllOff;
        self.ctx.reading = hw.read_switches();
        self.ctx.state = decode(self.ctx.reading);
        info!(
            "PodService started: state={} door_position={}",
            self.ctx.state, self.ctx.door_position
        );
        sink.emit(&PodEvent::Started {
            state: self.ctx.state,
            door_position: self.ctx.door_position,
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run the stall interlock check.  Returns the verdict.
    ///
    /// The first trip announces the lockout, forces the child lock on and
    /// records `AllOff` as the asserted command.
    pub fn safety_tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> bool {
        let was_locked = self.interlock.is_locked();
        let safe = self.interlock.check_safe(hw);

        if !safe && !was_locked {
            self.set_command(MotorCommand::AllOff, sink);
            if !self.ctx.child_lock {
                self.ctx.child_lock = true;
                sink.emit(&PodEvent::ChildLockChanged(true));
            }
            sink.emit(&PodEvent::SystemLocked {
                status: self.interlock.status(),
                voltage: self.interlock.last_voltage(),
            });
        }
        safe
    }

    /// Run one control cycle: read → decode → enforce verdict → sequence → drive.
    ///
    /// Returns the command asserted on the motors after this cycle.  The
    /// switches are decoded every cycle, locked or not, so `state()` and the
    /// status snapshot stay live after a lockout.  An `Undefined` state
    /// leaves the previous command in place without re-driving it.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> MotorCommand {
        self.ctx.cycles += 1;

        // 1. Read and decode.
        self.ctx.reading = hw.read_switches();
        let prev_state = self.ctx.state;
        self.ctx.state = decode(self.ctx.reading);
        if self.ctx.state != prev_state {
            info!("state: {} -> {}", prev_state, self.ctx.state);
            sink.emit(&PodEvent::StateChanged {
                from: prev_state,
                to: self.ctx.state,
            });
        }

        // 2. Latched verdict dominates the sequencer.
        if self.interlock.enforce(hw) {
            self.set_command(MotorCommand::AllOff, sink);
            return MotorCommand::AllOff;
        }

        // 3. Sequence.
        let Some(command) =
            self.sequencer
                .step(self.ctx.state, self.ctx.target, self.ctx.door_position)
        else {
            if self.ctx.command.is_moving() {
                debug!("holding {} on undefined switches", self.ctx.command);
            }
            return self.ctx.command;
        };

        // 4. Drive.
        hw.drive(command);
        self.set_command(command, sink);
        command
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an external request.  Takes effect on the next control cycle.
    pub fn handle_command(&mut self, cmd: PodCommand, sink: &mut impl EventSink) {
        match cmd {
            PodCommand::SetTarget(target) => self.set_target(target, sink),
            PodCommand::ToggleTarget => {
                if self.ctx.child_lock {
                    info!("button ignored: child lock on");
                    return;
                }
                self.set_target(self.ctx.target.toggled(), sink);
            }
            PodCommand::SetDoorPosition(raw) => {
                if self.set_door_position(raw) {
                    sink.emit(&PodEvent::DoorPositionChanged(self.ctx.door_position));
                } else {
                    sink.emit(&PodEvent::DoorPositionRejected(raw));
                }
            }
            PodCommand::SetChildLock(on) => {
                if !on && self.interlock.is_locked() {
                    warn!("child lock held: system locked after {}", self.interlock.status());
                    return;
                }
                if self.ctx.child_lock != on {
                    self.ctx.child_lock = on;
                    info!("child lock {}", if on { "ON" } else { "OFF" });
                    sink.emit(&PodEvent::ChildLockChanged(on));
                }
            }
        }
    }

    /// Request a door travel target.  Only 50 and 100 are accepted; any
    /// other value leaves the stored position untouched and returns `false`.
    pub fn set_door_position(&mut self, requested: u8) -> bool {
        let before = self.ctx.door_position;
        if !self.ctx.set_door_position(requested) {
            return false;
        }
        if self.ctx.door_position != before {
            self.settings_dirty = true;
        }
        true
    }

    // ── Persistence ───────────────────────────────────────────

    /// Load the stored door position, if any.  Missing or invalid values
    /// keep the configured default.
    pub fn restore_door_position(&mut self, settings: &impl SettingsPort) {
        match settings.load_door_position() {
            Ok(Some(raw)) => match DoorPosition::try_from(raw) {
                Ok(pos) => {
                    self.ctx.door_position = pos;
                    info!("door position restored: {}", pos);
                }
                Err(e) => warn!("stored {}; using {}", e, self.ctx.door_position),
            },
            Ok(None) => info!("no stored door position; using {}", self.ctx.door_position),
            Err(e) => warn!("door position load failed ({}); using {}", e, self.ctx.door_position),
        }
    }

    /// Save the door position if it changed.  Returns `true` if a save
    /// happened; a failed save stays dirty and is retried next call.
    pub fn persist_if_dirty(&mut self, settings: &mut impl SettingsPort) -> bool {
        if !self.settings_dirty {
            return false;
        }
        match settings.save_door_position(self.ctx.door_position) {
            Ok(()) => {
                self.settings_dirty = false;
                info!("door position {} saved", self.ctx.door_position);
                true
            }
            Err(e) => {
                warn!("door position save failed: {}", e);
                false
            }
        }
    }

    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_status(&self) -> StatusReport {
        StatusReport {
            state: self.ctx.state,
            target: self.ctx.target,
            command: self.ctx.command,
            door_position: self.ctx.door_position,
            child_lock: self.ctx.child_lock,
            safety_status: self.interlock.status(),
            locked: self.interlock.is_locked(),
            stall_voltage: self.interlock.last_voltage(),
            stall_threshold: self.interlock.threshold(),
            stall_sense_failures: self.interlock.sense_failures(),
            sensors: self.ctx.reading,
        }
    }

    /// Pod state decoded on the most recent control cycle.
    pub fn state(&self) -> PodState {
        self.ctx.state
    }

    pub fn door_position(&self) -> DoorPosition {
        self.ctx.door_position
    }

    pub fn safety_status(&self) -> SafetyStatus {
        self.interlock.status()
    }

    /// `false` once the interlock has latched, for the rest of the boot.
    pub fn is_safe_to_operate(&self) -> bool {
        !self.interlock.is_locked()
    }

    pub fn target(&self) -> Target {
        self.ctx.target
    }

    /// Command currently asserted on the motors.
    pub fn command(&self) -> MotorCommand {
        self.ctx.command
    }

    pub fn child_lock(&self) -> bool {
        self.ctx.child_lock
    }

    /// Control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.ctx.cycles
    }

    pub fn config(&self) -> &PodConfig {
        &self.ctx.config
    }

    /// Re-arm the stall latch.  Harness builds only.
    #[cfg(any(test, feature = "test-harness"))]
    pub fn reset_lockout_for_test(&mut self) {
        self.interlock.reset_for_test();
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_target(&mut self, target: Target, sink: &mut impl EventSink) {
        if self.ctx.target == target {
            return;
        }
        self.ctx.target = target;
        info!("target: {}", target);
        sink.emit(&PodEvent::TargetChanged(target));
    }

    fn set_command(&mut self, command: MotorCommand, sink: &mut impl EventSink) {
        let prev = self.ctx.command;
        if prev == command {
            return;
        }
        self.ctx.command = command;
        sink.emit(&PodEvent::CommandChanged {
            from: prev,
            to: command,
        });
    }
}
