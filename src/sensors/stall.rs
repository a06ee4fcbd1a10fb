//! Motor stall detection from the supply sense voltage.
//!
//! A stalled motor draws current without moving; the rise shows up as a
//! voltage across the sense element.  Each check takes a burst of raw ADC
//! samples, averages them and converts through the linear ADC transform:
//!
//! ```text
//! volts = (avg_counts / full_scale) * reference
//! ```
//!
//! No hysteresis or debounce beyond the averaging: one above-threshold
//! average is a stall.

use crate::app::ports::SensorPort;
use crate::config::PodConfig;

pub struct StallMonitor {
    threshold_volts: f32,
    sample_count: u16,
    volts_per_count: f32,
    /// Most recent averaged voltage (V).
    last_voltage: f32,
}

impl StallMonitor {
    pub fn new(config: &PodConfig) -> Self {
        Self {
            threshold_volts: config.stall_voltage_threshold,
            sample_count: config.stall_sample_count.max(1),
            volts_per_count: config.adc_reference_volts / config.adc_full_scale(),
            last_voltage: 0.0,
        }
    }

    /// Average `sample_count` raw samples and return the sense voltage.
    pub fn sample_voltage(&mut self, adc: &mut impl SensorPort) -> f32 {
        let total: u32 = (0..self.sample_count)
            .map(|_| u32::from(adc.read_stall_sense_raw()))
            .sum();
        let avg_counts = total as f32 / f32::from(self.sample_count);
        self.last_voltage = self.counts_to_volts(avg_counts);
        self.last_voltage
    }

    /// Take a fresh sample burst and compare against the threshold.
    pub fn is_stalled(&mut self, adc: &mut impl SensorPort) -> bool {
        self.sample_voltage(adc) > self.threshold_volts
    }

    pub fn counts_to_volts(&self, counts: f32) -> f32 {
        counts * self.volts_per_count
    }

    pub fn last_voltage(&self) -> f32 {
        self.last_voltage
    }

    pub fn threshold(&self) -> f32 {
        self.threshold_volts
    }
}
