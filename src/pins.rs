//! GPIO / peripheral pin assignments for the SolePod controller board
//! (ESP32-S3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Motor drivers (two H-bridges, enable + direction each)
// ---------------------------------------------------------------------------

/// Door motor enable (active HIGH).
pub const DOOR_MOTOR_EN_GPIO: i32 = 46;
/// Door motor direction: HIGH = opening, LOW = closing.
pub const DOOR_MOTOR_DIR_GPIO: i32 = 3;
/// Tray motor enable (active HIGH).
pub const TRAY_MOTOR_EN_GPIO: i32 = 10;
/// Tray motor direction: LOW = opening, HIGH = closing.
pub const TRAY_MOTOR_DIR_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// Limit switches (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const DOOR_CLOSED_SWITCH_GPIO: i32 = 45;
pub const DOOR_OPENED_SWITCH_GPIO: i32 = 48;
pub const TRAY_CLOSED_SWITCH_GPIO: i32 = 35;
pub const TRAY_OPENED_SWITCH_GPIO: i32 = 36;

// ---------------------------------------------------------------------------
// Operator input
// ---------------------------------------------------------------------------

/// Door toggle button (active-low, internal pull-up).
pub const DOOR_BUTTON_GPIO: i32 = 47;

// ---------------------------------------------------------------------------
// Stall sense (ADC1)
// ---------------------------------------------------------------------------

/// Motor supply sense voltage.  GPIO 9 is ADC1 channel 8 on the ESP32-S3.
pub const STALL_SENSE_GPIO: i32 = 9;
pub const STALL_SENSE_ADC1_CHANNEL: u32 = 8;
