//! Debounced door button.
//!
//! ## Hardware
//!
//! Active-low momentary switch on a pull-up input.  The main loop polls it
//! once per control cycle; a press is reported once, on the debounced
//! released → pressed edge.  Holding the button does not repeat.

use embedded_hal::digital::InputPin;

use crate::error::SensorError;

pub const DEBOUNCE_MS: u64 = 50;

pub struct DoorButton<P> {
    pin: P,
    /// Debounced level (`true` = pressed).
    stable: bool,
    /// Raw level seen on the previous poll.
    candidate: bool,
    /// Uptime when `candidate` last changed.
    changed_at_ms: u64,
}

impl<P: InputPin> DoorButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            stable: false,
            candidate: false,
            changed_at_ms: 0,
        }
    }

    /// Sample the pin.  Returns `true` exactly once per debounced press.
    pub fn poll(&mut self, now_ms: u64) -> Result<bool, SensorError> {
        let raw = self.pin.is_low().map_err(|_| SensorError::GpioReadFailed)?;

        if raw != self.candidate {
            self.candidate = raw;
            self.changed_at_ms = now_ms;
            return Ok(false);
        }

        if raw != self.stable && now_ms.saturating_sub(self.changed_at_ms) >= DEBOUNCE_MS {
            self.stable = raw;
            return Ok(raw);
        }
        Ok(false)
    }

    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}
