//! Fixed-cadence task scheduler.
//!
//! The control core never sleeps.  The main loop asks the scheduler which
//! tasks are due at the current uptime, runs them in priority order, then
//! sleeps for [`Scheduler::ms_until_next`].
//!
//! ```text
//!   uptime ──▶ ┌──────────────┐ ──▶ SafetyCheck   (50 ms)
//!              │  Scheduler   │ ──▶ ControlCycle  (10 ms)
//!              └──────────────┘ ──▶ StatusReport  (500 ms)
//! ```
//!
//! The stall check has its own slot so its worst-case latency is bounded
//! by its own interval, not by how much work the control cycle does.

use heapless::Vec;

use crate::config::PodConfig;

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// Periodic work items, in priority order (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Stall interlock check.
    SafetyCheck,
    /// Decode → sequence → drive.
    ControlCycle,
    /// Status snapshot to the event sink.
    StatusReport,
}

impl Task {
    pub const COUNT: usize = 3;

    pub const ALL: [Self; Self::COUNT] = [Self::SafetyCheck, Self::ControlCycle, Self::StatusReport];
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
struct Slot {
    interval_ms: u64,
    /// Uptime of the last run; `None` until the first run.
    last_run_ms: Option<u64>,
}

impl Slot {
    fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms.max(1)),
            last_run_ms: None,
        }
    }

    fn is_due(&self, now_ms: u64) -> bool {
        match self.last_run_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    fn ms_until_due(&self, now_ms: u64) -> u64 {
        match self.last_run_ms {
            None => 0,
            Some(last) => (last + self.interval_ms).saturating_sub(now_ms),
        }
    }
}

pub struct Scheduler {
    /// Indexed in [`Task::ALL`] order.
    slots: [Slot; Task::COUNT],
}

impl Scheduler {
    pub fn new(config: &PodConfig) -> Self {
        Self {
            slots: [
                Slot::new(config.safety_check_interval_ms),
                Slot::new(config.control_loop_interval_ms),
                Slot::new(config.status_report_interval_ms),
            ],
        }
    }

    /// Return every task due at `now_ms`, highest priority first, and mark
    /// them as run.
    pub fn poll(&mut self, now_ms: u64) -> Vec<Task, { Task::COUNT }> {
        let mut due = Vec::new();
        for (task, slot) in Task::ALL.iter().zip(self.slots.iter_mut()) {
            if slot.is_due(now_ms) {
                slot.last_run_ms = Some(now_ms);
                // Capacity equals the task count, so this cannot fail.
                let _ = due.push(*task);
            }
        }
        due
    }

    /// Milliseconds until the earliest task becomes due.
    pub fn ms_until_next(&self, now_ms: u64) -> u64 {
        self.slots
            .iter()
            .map(|s| s.ms_until_due(now_ms))
            .min()
            .unwrap_or(0)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
