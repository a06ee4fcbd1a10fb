//! Safety interlock.
//!
//! The interlock runs on its own fixed cadence (every 50 ms by default),
//! independent of the 10 ms control cycle, so a stall is caught within a
//! bounded worst-case latency no matter what the sequencer is doing.
//!
//! ## Lockout lifecycle
//!
//! ```text
//!   Armed ──[stall-sense average > threshold]──▶ Locked
//!     ▲                                            │
//!     └──────────────── power cycle ───────────────┘
//! ```
//!
//! 1. While `Armed`, each check takes a fresh sample burst from the
//!    [`StallMonitor`].
//! 2. The first above-threshold average moves the latch to `Locked`,
//!    records [`SafetyStatus::MotorStall`] and kills both motors.
//! 3. Once `Locked`, every check kills both motors and returns `false`
//!    without sampling.  There is no runtime path back to `Armed`.
//!
//! The control cycle calls [`SafetyInterlock::enforce`] before it lets
//! any sequencer output reach the driver, so a latched verdict always
//! wins over the sequencer.

use core::fmt;

use log::error;
use serde::Serialize;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::PodConfig;
use crate::sensors::stall::StallMonitor;

/// Observable safety verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[repr(u8)]
pub enum SafetyStatus {
    #[default]
    Ok = 0,
    MotorStall = 1,
    /// Reserved; nothing raises it yet.
    ObstacleDetected = 2,
    /// Reserved.
    Overcurrent = 3,
    /// Reserved.
    SystemError = 4,
}

impl SafetyStatus {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::MotorStall => "MOTOR_STALL",
            Self::ObstacleDetected => "OBSTACLE_DETECTED",
            Self::Overcurrent => "OVERCURRENT",
            Self::SystemError => "SYSTEM_ERROR",
        }
    }
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The one-way latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterlockState {
    Armed,
    Locked,
}

/// Stall interlock.
pub struct SafetyInterlock {
    state: InterlockState,
    status: SafetyStatus,
    monitor: StallMonitor,
    /// Failed stall-sense conversions reported by the port at the last check.
    sense_failures: u32,
}

impl SafetyInterlock {
    pub fn new(config: &PodConfig) -> Self {
        Self {
            state: InterlockState::Armed,
            status: SafetyStatus::Ok,
            monitor: StallMonitor::new(config),
            sense_failures: 0,
        }
    }

    /// Evaluate the stall sense and gate the motors.
    ///
    /// Returns `true` only while armed and the fresh average is at or below
    /// the threshold.
    pub fn check_safe(&mut self, hw: &mut (impl SensorPort + ActuatorPort)) -> bool {
        if self.enforce(hw) {
            return false;
        }

        let stalled = self.monitor.is_stalled(hw);
        self.sense_failures = hw.stall_sense_failures();

        if stalled {
            self.state = InterlockState::Locked;
            self.status = SafetyStatus::MotorStall;
            error!(
                "MOTOR STALL: sense {:.3} V > {:.3} V, system locked until power cycle",
                self.monitor.last_voltage(),
                self.monitor.threshold()
            );
            hw.all_off();
            return false;
        }
        true
    }

    /// Apply a latched verdict without sampling.  Returns `true` if the
    /// interlock is locked (and the motors were just commanded off).
    pub fn enforce(&self, hw: &mut impl ActuatorPort) -> bool {
        if self.is_locked() {
            hw.all_off();
            return true;
        }
        false
    }

    pub fn is_locked(&self) -> bool {
        self.state == InterlockState::Locked
    }

    pub fn state(&self) -> InterlockState {
        self.state
    }

    pub fn status(&self) -> SafetyStatus {
        self.status
    }

    /// Stall-sense voltage from the most recent sample burst.
    pub fn last_voltage(&self) -> f32 {
        self.monitor.last_voltage()
    }

    pub fn threshold(&self) -> f32 {
        self.monitor.threshold()
    }

    /// Failed stall-sense conversions seen up to the last check.
    pub fn sense_failures(&self) -> u32 {
        self.sense_failures
    }

    /// Re-arm the latch.  Harness builds only; firmware has no way back
    /// from `Locked` short of a restart.
    #[cfg(any(test, feature = "test-harness"))]
    pub fn reset_for_test(&mut self) {
        self.state = InterlockState::Armed;
        self.status = SafetyStatus::Ok;
    }
}
