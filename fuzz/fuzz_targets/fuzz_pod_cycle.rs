//! Fuzz target: drive the pod service with arbitrary switch, stall and
//! command bytes.
//!
//! Each input byte pair is one cycle: the first byte is the switch bitmap
//! (low nibble) plus an operation selector (high nibble), the second is
//! the argument.  Must never panic, and a latched pod must never drive.

#![no_main]

use libfuzzer_sys::fuzz_target;
use solepod::app::commands::PodCommand;
use solepod::app::events::PodEvent;
use solepod::app::ports::{ActuatorPort, EventSink, SensorPort};
use solepod::app::service::PodService;
use solepod::config::PodConfig;
use solepod::fsm::MotorCommand;
use solepod::sensors::limit_switches::SensorReading;

#[derive(Default)]
struct Rig {
    reading: SensorReading,
    stall_raw: u16,
    drives_after_lock: u32,
    locked: bool,
}

impl SensorPort for Rig {
    fn read_switches(&mut self) -> SensorReading {
        self.reading
    }
    fn read_stall_sense_raw(&mut self) -> u16 {
        self.stall_raw
    }
}

impl ActuatorPort for Rig {
    fn drive(&mut self, _command: MotorCommand) {
        if self.locked {
            self.drives_after_lock += 1;
        }
    }
    fn all_off(&mut self) {}
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &PodEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut svc) = PodService::new(PodConfig::default()) else {
        return;
    };
    let mut rig = Rig::default();
    let mut sink = NullSink;
    svc.start(&mut rig, &mut sink);

    for pair in data.chunks_exact(2) {
        let (op, arg) = (pair[0], pair[1]);
        rig.reading = SensorReading::from_bits(op & 0x0F);

        match op >> 4 {
            0 => rig.stall_raw = u16::from(arg) << 4,
            1 => {
                svc.safety_tick(&mut rig, &mut sink);
            }
            2 => {
                let word = (u16::from(arg >> 4) << 8) | u16::from(arg & 0x0F);
                if let Some(cmd) = PodCommand::from_word(word) {
                    svc.handle_command(cmd, &mut sink);
                }
            }
            3 => {
                svc.handle_command(PodCommand::SetDoorPosition(arg), &mut sink);
            }
            _ => {
                let cmd = svc.tick(&mut rig, &mut sink);
                if rig.locked {
                    assert_eq!(cmd, MotorCommand::AllOff);
                }
            }
        }
        rig.locked = !svc.is_safe_to_operate();
    }

    assert_eq!(rig.drives_after_lock, 0);
});
