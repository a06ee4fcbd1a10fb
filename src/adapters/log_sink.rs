//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing pod events to the ESP-IDF logger
//! (UART / USB-CDC in production).  The periodic `Status` event is the
//! serial debug printout.  A BLE notifier would implement the same trait.

use log::{Level, debug, error, info, log_enabled, warn};

use crate::app::events::{PodEvent, StatusReport};
use crate::app::ports::EventSink;

/// Adapter that logs every [`PodEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PodEvent) {
        match event {
            PodEvent::Status(s) => log_status(s),
            PodEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            PodEvent::CommandChanged { from, to } => {
                info!("MOTOR | {} -> {}", from, to);
            }
            PodEvent::TargetChanged(t) => {
                info!("TARGET | {}", t);
            }
            PodEvent::DoorPositionChanged(p) => {
                info!("DOOR | position={}", p);
            }
            PodEvent::DoorPositionRejected(raw) => {
                warn!("DOOR | rejected position={} (allowed: 50, 100)", raw);
            }
            PodEvent::ChildLockChanged(on) => {
                info!("CHILD LOCK | {}", if *on { "ON" } else { "OFF" });
            }
            PodEvent::SystemLocked { status, voltage } => {
                error!("LOCKED | {} at {:.3} V", status, voltage);
            }
            PodEvent::Started {
                state,
                door_position,
            } => {
                info!("START | state={} door_position={}", state, door_position);
            }
        }
    }
}

fn log_status(s: &StatusReport) {
    info!(
        "STATUS | state={} target={} motor={} | child_lock={} door={} | \
         sense={:.3}V (thr {:.3}V) safety={} | \
         DC={} DO={} TC={} TO={}",
        s.state,
        s.target,
        s.command,
        if s.child_lock { "ON" } else { "OFF" },
        s.door_position,
        s.stall_voltage,
        s.stall_threshold,
        s.safety_status,
        u8::from(s.sensors.door_closed),
        u8::from(s.sensors.door_opened),
        u8::from(s.sensors.tray_closed),
        u8::from(s.sensors.tray_opened),
    );
    if s.locked {
        error!("!!! SYSTEM LOCKED - POWER CYCLE REQUIRED !!!");
    }
    if s.stall_sense_failures > 0 {
        warn!(
            "CHECK HARDWARE | stall sense: {} failed reads",
            s.stall_sense_failures
        );
    }
    if log_enabled!(Level::Debug) {
        match serde_json::to_string(s) {
            Ok(json) => debug!("STATUS JSON | {}", json),
            Err(e) => warn!("status encode failed: {}", e),
        }
    }
}
