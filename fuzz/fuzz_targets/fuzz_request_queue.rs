//! Fuzz target: push arbitrary words through the request queue.
//!
//! Unknown tags must be skipped without stalling the drain, and every
//! decoded command must re-encode to the word it came from.

#![no_main]

use libfuzzer_sys::fuzz_target;
use solepod::app::commands::PodCommand;
use solepod::events::RequestQueue;

fuzz_target!(|data: &[u8]| {
    let queue = RequestQueue::new();

    for pair in data.chunks_exact(2) {
        let word = u16::from_le_bytes([pair[0], pair[1]]);
        if let Some(cmd) = PodCommand::from_word(word) {
            let normalised = cmd.to_word();
            assert_eq!(PodCommand::from_word(normalised), Some(cmd));
            let _ = queue.push(cmd);
        }
        if pair[0] & 1 == 0 {
            let _ = queue.pop();
        }
    }

    queue.drain(|_| {});
    assert!(queue.is_empty());
});
