//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                    |
//! |------------|---------------|--------------------------------|
//! | `hardware` | SensorPort    | Limit switches, stall ADC      |
//! |            | ActuatorPort  | Door/tray H-bridge GPIO        |
//! | `log_sink` | EventSink     | Serial log output              |
//! | `nvs`      | SettingsPort  | NVS / in-memory store          |
//! | `time`     | (uptime)      | ESP32 system timer             |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
