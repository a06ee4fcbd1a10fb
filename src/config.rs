//! System configuration parameters
//!
//! All tunable parameters for the pod control core.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsm::DoorPosition;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodConfig {
    // --- Timing ---
    /// Main control cycle interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Stall-sense interlock check interval (milliseconds)
    pub safety_check_interval_ms: u32,
    /// Status report interval (milliseconds)
    pub status_report_interval_ms: u32,

    // --- Stall detection ---
    /// Averaged sense voltage above which the motor circuit is stalled (V)
    pub stall_voltage_threshold: f32,
    /// Raw ADC samples averaged per stall check
    pub stall_sample_count: u16,
    /// ADC reference voltage (V)
    pub adc_reference_volts: f32,
    /// ADC resolution (bits)
    pub adc_resolution_bits: u8,

    // --- Door ---
    /// Door travel target used until a stored value is restored
    pub default_door_position: DoorPosition,
}

impl Default for PodConfig {
    fn default() -> Self {
        Self {
            // Timing
            control_loop_interval_ms: 10,   // 100 Hz
            safety_check_interval_ms: 50,   // 20 Hz
            status_report_interval_ms: 500, // 2 Hz

            // Stall detection
            stall_voltage_threshold: 0.15,
            stall_sample_count: 50,
            adc_reference_volts: 3.3,
            adc_resolution_bits: 12,

            // Door
            default_door_position: DoorPosition::Full,
        }
    }
}

impl PodConfig {
    /// Largest raw ADC reading (e.g. 4095 for 12 bits).
    ///
    /// Always finite and non-zero: resolutions outside 1..=32 bits are
    /// clamped here and rejected by [`validate`](Self::validate).
    pub fn adc_full_scale(&self) -> f32 {
        let bits = u32::from(self.adc_resolution_bits.clamp(1, 32));
        ((1u64 << bits) - 1) as f32
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control_loop_interval_ms must be > 0"));
        }
        if self.safety_check_interval_ms == 0 {
            return Err(Error::Config("safety_check_interval_ms must be > 0"));
        }
        if self.status_report_interval_ms == 0 {
            return Err(Error::Config("status_report_interval_ms must be > 0"));
        }
        if self.stall_sample_count == 0 {
            return Err(Error::Config("stall_sample_count must be > 0"));
        }
        if !(8..=16).contains(&self.adc_resolution_bits) {
            return Err(Error::Config("adc_resolution_bits must be 8–16"));
        }
        if !(self.adc_reference_volts > 0.0 && self.adc_reference_volts.is_finite()) {
            return Err(Error::Config("adc_reference_volts must be > 0"));
        }
        if !(self.stall_voltage_threshold > 0.0
            && self.stall_voltage_threshold < self.adc_reference_volts)
        {
            return Err(Error::Config(
                "stall_voltage_threshold must be within (0, adc_reference_volts)",
            ));
        }
        Ok(())
    }
}
