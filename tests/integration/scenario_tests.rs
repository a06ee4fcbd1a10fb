//! End-to-end sequencing scenarios driven through the public service API.

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

use solepod::app::commands::PodCommand;
use solepod::app::events::PodEvent;
use solepod::app::service::PodService;
use solepod::config::PodConfig;
use solepod::events::RequestQueue;
use solepod::fsm::{DoorPosition, MotorCommand, PodState, Target};

fn started_at(state: PodState) -> (PodService, MockHardware, RecordingSink) {
    let mut svc = PodService::new(PodConfig::default()).unwrap();
    let mut hw = MockHardware::at(state);
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, &mut sink);
    (svc, hw, sink)
}

/// Tick and let the mechanism respond until the command settles on
/// `AllOff` or `max_cycles` is reached.
fn run_until_idle(
    svc: &mut PodService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    max_cycles: usize,
) {
    for _ in 0..max_cycles {
        let cmd = svc.tick(hw, sink);
        if cmd == MotorCommand::AllOff {
            return;
        }
        hw.advance();
    }
    panic!("pod still moving after {} cycles", max_cycles);
}

#[test]
fn start_stops_motors_and_reports_boot_state() {
    let (svc, hw, sink) = started_at(PodState::DoorOpen);
    assert_eq!(hw.calls, vec![ActuatorCall::AllOff]);
    assert_eq!(svc.state(), PodState::DoorOpen);
    assert_eq!(
        sink.events[0],
        PodEvent::Started {
            state: PodState::DoorOpen,
            door_position: DoorPosition::Full,
        }
    );
}

#[test]
fn full_open_runs_door_then_tray() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    svc.handle_command(PodCommand::SetTarget(Target::Open), &mut sink);

    run_until_idle(&mut svc, &mut hw, &mut sink, 10);

    assert_eq!(svc.state(), PodState::Open);
    assert_eq!(
        sink.command_trail(),
        vec![
            MotorCommand::DoorOpening,
            MotorCommand::TrayOpening,
            MotorCommand::AllOff,
        ]
    );
}

#[test]
fn half_door_open_stops_with_tray_stowed() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    svc.handle_command(PodCommand::SetDoorPosition(50), &mut sink);
    svc.handle_command(PodCommand::SetTarget(Target::Open), &mut sink);

    run_until_idle(&mut svc, &mut hw, &mut sink, 10);

    assert_eq!(svc.state(), PodState::DoorOpen);
    assert!(!hw.ever_drove(MotorCommand::TrayOpening));
    assert_eq!(
        sink.command_trail(),
        vec![MotorCommand::DoorOpening, MotorCommand::AllOff]
    );
}

#[test]
fn full_close_retracts_tray_before_door() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Open);
    assert_eq!(svc.target(), Target::Closed);

    run_until_idle(&mut svc, &mut hw, &mut sink, 10);

    assert_eq!(svc.state(), PodState::Closed);
    assert_eq!(
        sink.command_trail(),
        vec![
            MotorCommand::TrayClosing,
            MotorCommand::DoorClosing,
            MotorCommand::AllOff,
        ]
    );
}

#[test]
fn closing_with_half_door_still_retracts_tray() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Open);
    svc.handle_command(PodCommand::SetDoorPosition(50), &mut sink);

    run_until_idle(&mut svc, &mut hw, &mut sink, 10);

    assert_eq!(svc.state(), PodState::Closed);
    assert!(hw.ever_drove(MotorCommand::TrayClosing));
}

#[test]
fn target_reversal_mid_travel_turns_door_around() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    svc.handle_command(PodCommand::SetTarget(Target::Open), &mut sink);

    assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::DoorOpening);
    hw.advance();
    assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::DoorOpening);
    assert_eq!(svc.state(), PodState::DoorMidway);

    svc.handle_command(PodCommand::ToggleTarget, &mut sink);
    assert_eq!(svc.target(), Target::Closed);
    assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::DoorClosing);

    hw.advance();
    assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::AllOff);
    assert_eq!(svc.state(), PodState::Closed);
}

#[test]
fn undefined_reading_holds_last_command_without_driving() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    svc.handle_command(PodCommand::SetTarget(Target::Open), &mut sink);
    svc.tick(&mut hw, &mut sink);
    assert_eq!(hw.drive_count(), 1);

    hw.set_state(PodState::Undefined);
    for _ in 0..5 {
        assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::DoorOpening);
    }
    assert_eq!(svc.state(), PodState::Undefined);
    assert_eq!(hw.drive_count(), 1);
    assert_eq!(svc.command(), MotorCommand::DoorOpening);
}

#[test]
fn settled_pod_keeps_asserting_all_off() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    for _ in 0..3 {
        assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::AllOff);
    }
    assert_eq!(hw.drive_count(), 3);
    assert!(sink.command_trail().is_empty());
}

#[test]
fn state_changes_are_reported_once_each() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    svc.handle_command(PodCommand::SetTarget(Target::Open), &mut sink);
    run_until_idle(&mut svc, &mut hw, &mut sink, 10);

    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            PodEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (PodState::Closed, PodState::DoorMidway),
            (PodState::DoorMidway, PodState::DoorOpen),
            (PodState::DoorOpen, PodState::TrayMidway),
            (PodState::TrayMidway, PodState::Open),
        ]
    );
}

#[test]
fn child_lock_ignores_button_but_not_direct_target() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    svc.handle_command(PodCommand::SetChildLock(true), &mut sink);
    assert!(svc.child_lock());

    svc.handle_command(PodCommand::ToggleTarget, &mut sink);
    assert_eq!(svc.target(), Target::Closed);
    assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::AllOff);

    svc.handle_command(PodCommand::SetTarget(Target::Open), &mut sink);
    assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::DoorOpening);

    svc.handle_command(PodCommand::SetChildLock(false), &mut sink);
    svc.handle_command(PodCommand::ToggleTarget, &mut sink);
    assert_eq!(svc.target(), Target::Closed);
}

#[test]
fn queued_requests_apply_in_order() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    let queue = RequestQueue::new();
    assert!(queue.push(PodCommand::SetDoorPosition(50)));
    assert!(queue.push(PodCommand::ToggleTarget));
    assert!(queue.push(PodCommand::SetDoorPosition(80)));

    queue.drain(|cmd| svc.handle_command(cmd, &mut sink));

    assert!(queue.is_empty());
    assert_eq!(svc.door_position(), DoorPosition::Half);
    assert_eq!(svc.target(), Target::Open);
    assert_eq!(sink.count(|e| matches!(e, PodEvent::DoorPositionRejected(80))), 1);
    assert_eq!(svc.tick(&mut hw, &mut sink), MotorCommand::DoorOpening);
}

#[test]
fn status_snapshot_serialises_to_json() {
    let (mut svc, mut hw, mut sink) = started_at(PodState::Closed);
    svc.handle_command(PodCommand::SetTarget(Target::Open), &mut sink);
    svc.safety_tick(&mut hw, &mut sink);
    svc.tick(&mut hw, &mut sink);

    let report = svc.build_status();
    assert_eq!(report.command, MotorCommand::DoorOpening);
    assert!(!report.locked);

    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["state"], "Closed");
    assert_eq!(json["target"], "Open");
    assert_eq!(json["command"], "DoorOpening");
    assert_eq!(json["door_position"], 100);
    assert_eq!(json["safety_status"], "Ok");
    assert_eq!(json["locked"], false);
    assert_eq!(json["sensors"]["door_closed"], true);
    assert_eq!(json["sensors"]["tray_opened"], false);
}
