//! Request mailbox.
//!
//! Connectivity layers (door button, BLE write handler, Wi-Fi command) run
//! outside the control cycle.  They never call into the service; they
//! deposit a [`PodCommand`] here and the control loop drains the queue at
//! the start of its next cycle.
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌──────────────┐
//! │ Door button │────▶│                │     │              │
//! │ BLE write   │────▶│  RequestQueue  │────▶│ Control loop │
//! │ Wi-Fi cmd   │────▶│  (lock-free)   │     │  (consumer)  │
//! └─────────────┘     └────────────────┘     └──────────────┘
//! ```
//!
//! Single producer, single consumer.  Every slot is an atomic, so the
//! queue needs no `unsafe` and can live in a `static`.

use core::sync::atomic::{AtomicU8, AtomicU16, Ordering};

use crate::app::commands::PodCommand;

/// Maximum number of pending requests (one slot stays empty).
pub const REQUEST_QUEUE_CAP: usize = 16;

/// Process-wide mailbox used by the firmware binary.
pub static POD_REQUESTS: RequestQueue = RequestQueue::new();

// ── Lock-free SPSC ring buffer ────────────────────────────────

pub struct RequestQueue {
    head: AtomicU8,
    tail: AtomicU8,
    slots: [AtomicU16; REQUEST_QUEUE_CAP],
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            slots: [const { AtomicU16::new(0) }; REQUEST_QUEUE_CAP],
        }
    }

    /// Enqueue a request.  Producer side only.
    /// Returns `false` if the queue is full (request dropped).
    pub fn push(&self, cmd: PodCommand) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % REQUEST_QUEUE_CAP as u8;

        if next_head == tail {
            return false;
        }

        self.slots[head as usize].store(cmd.to_word(), Ordering::Relaxed);
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Dequeue the oldest request.  Consumer side only.
    pub fn pop(&self) -> Option<PodCommand> {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let head = self.head.load(Ordering::Acquire);

            if tail == head {
                return None;
            }

            let word = self.slots[tail as usize].load(Ordering::Relaxed);
            self.tail
                .store((tail + 1) % REQUEST_QUEUE_CAP as u8, Ordering::Release);

            // Unknown words are skipped rather than ending the drain.
            if let Some(cmd) = PodCommand::from_word(word) {
                return Some(cmd);
            }
        }
    }

    /// Drain all pending requests into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(PodCommand)) {
        while let Some(cmd) = self.pop() {
            handler(cmd);
        }
    }

    pub fn is_empty(&self) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        tail == head
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        (head + REQUEST_QUEUE_CAP - tail) % REQUEST_QUEUE_CAP
    }
}
