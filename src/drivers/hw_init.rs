//! One-shot stall-sense ADC initialization and raw reads.
//!
//! Configures ADC1 in oneshot mode on the stall-sense channel using raw
//! ESP-IDF sys calls.  Called once from `main()` before the poll loop.
//! Digital pins (switches, motors, button) go through `PinDriver` instead.
//!
//! On the host the ADC is replaced by an atomic that tests and the
//! simulation can set.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

use crate::error::SensorError;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    AdcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::AdcChannelFailed(rc) => write!(f, "ADC1 channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_stall_adc()` completes before the poll
/// loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
pub fn init_stall_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: handle initialised above; single-threaded boot path.
    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), pins::STALL_SENSE_ADC1_CHANNEL, &chan_cfg)
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcChannelFailed(ret));
    }

    info!(
        "hw_init: ADC1 configured (CH{}=stall sense, GPIO{})",
        pins::STALL_SENSE_ADC1_CHANNEL,
        pins::STALL_SENSE_GPIO
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_stall_adc() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): stall ADC init skipped");
    Ok(())
}

/// One raw 12-bit stall-sense sample.
#[cfg(target_os = "espidf")]
pub fn stall_adc_read() -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract; single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), pins::STALL_SENSE_ADC1_CHANNEL, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed(ret));
    }
    Ok(raw.max(0) as u16)
}

#[cfg(not(target_os = "espidf"))]
static SIM_STALL_ADC: core::sync::atomic::AtomicU16 = core::sync::atomic::AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn stall_adc_read() -> Result<u16, SensorError> {
    Ok(SIM_STALL_ADC.load(core::sync::atomic::Ordering::Relaxed))
}

/// Set the simulated stall-sense reading.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_stall_adc(raw: u16) {
    SIM_STALL_ADC.store(raw, core::sync::atomic::Ordering::Relaxed);
}
