//! Sensor subsystem: the switch decoder, the stall monitor and the
//! aggregating [`SensorHub`].
//!
//! The hub owns the limit-switch pins and produces a [`SensorReading`] each
//! control cycle; the stall monitor pulls raw samples through the
//! [`SensorPort`](crate::app::ports::SensorPort) on the safety cadence.

pub mod limit_switches;
pub mod stall;

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::drivers::hw_init;
use crate::error::SensorError;
use limit_switches::{LimitSwitches, SensorReading};

/// Source of raw stall-sense samples.
pub type StallReader = fn() -> Result<u16, SensorError>;

/// A dead ADC fails every sample; log the first failure of a run, then
/// every this many.
const STALL_FAIL_LOG_EVERY: u32 = 500;

/// Aggregates the pod's inputs.
pub struct SensorHub<P> {
    switches: LimitSwitches<P>,
    stall_reader: StallReader,
    last_reading: SensorReading,
    read_failures: u32,
    /// Failed stall-sense conversions since boot.
    stall_failures: u32,
    /// Consecutive failed stall-sense conversions.
    stall_fail_streak: u32,
}

impl<P: InputPin> SensorHub<P> {
    /// Hub reading the stall sense from the board ADC.
    pub fn new(switches: LimitSwitches<P>) -> Self {
        Self::with_stall_reader(switches, hw_init::stall_adc_read)
    }

    pub fn with_stall_reader(switches: LimitSwitches<P>, stall_reader: StallReader) -> Self {
        Self {
            switches,
            stall_reader,
            last_reading: SensorReading::default(),
            read_failures: 0,
            stall_failures: 0,
            stall_fail_streak: 0,
        }
    }

    /// Sample the switches.  On a GPIO error the reading is all-inactive,
    /// which decodes to `Undefined` and makes the sequencer hold.
    pub fn read_switches(&mut self) -> SensorReading {
        let reading = match self.switches.read() {
            Ok(r) => r,
            Err(e) => {
                self.read_failures = self.read_failures.saturating_add(1);
                warn!("limit switch read failed: {} (total {})", e, self.read_failures);
                SensorReading::default()
            }
        };
        self.last_reading = reading;
        reading
    }

    /// One raw stall-sense ADC sample.  A failed conversion is counted and
    /// reads as 0, which the stall monitor sees as a quiet line.
    pub fn read_stall_raw(&mut self) -> u16 {
        match (self.stall_reader)() {
            Ok(raw) => {
                if self.stall_fail_streak > 0 {
                    info!(
                        "stall sense recovered after {} failed reads",
                        self.stall_fail_streak
                    );
                    self.stall_fail_streak = 0;
                }
                raw
            }
            Err(e) => {
                self.stall_failures = self.stall_failures.saturating_add(1);
                self.stall_fail_streak = self.stall_fail_streak.saturating_add(1);
                if self.stall_fail_streak % STALL_FAIL_LOG_EVERY == 1 {
                    warn!(
                        "stall sense read failed: {} ({} in a row, {} total); stall protection blind",
                        e, self.stall_fail_streak, self.stall_failures
                    );
                }
                0
            }
        }
    }

    pub fn last_reading(&self) -> SensorReading {
        self.last_reading
    }

    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }

    pub fn stall_failures(&self) -> u32 {
        self.stall_failures
    }
}
