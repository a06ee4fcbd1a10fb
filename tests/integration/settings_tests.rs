//! Door-position persistence through the settings port.

use crate::mock_hw::{MockSettings, RecordingSink};

use solepod::adapters::nvs::NvsAdapter;
use solepod::app::commands::PodCommand;
use solepod::app::events::PodEvent;
use solepod::app::ports::SettingsPort;
use solepod::app::service::PodService;
use solepod::config::PodConfig;
use solepod::fsm::DoorPosition;

fn service() -> PodService {
    PodService::new(PodConfig::default()).unwrap()
}

#[test]
fn restores_stored_half_position() {
    let mut svc = service();
    svc.restore_door_position(&MockSettings::with(50));
    assert_eq!(svc.door_position(), DoorPosition::Half);
    assert!(!svc.is_settings_dirty());
}

#[test]
fn corrupt_stored_value_keeps_default() {
    let mut svc = service();
    svc.restore_door_position(&MockSettings::with(73));
    assert_eq!(svc.door_position(), DoorPosition::Full);
}

#[test]
fn missing_or_unreadable_store_keeps_default() {
    let mut svc = service();
    svc.restore_door_position(&MockSettings::default());
    assert_eq!(svc.door_position(), DoorPosition::Full);

    let broken = MockSettings {
        stored: Some(50),
        fail_load: true,
        ..Default::default()
    };
    svc.restore_door_position(&broken);
    assert_eq!(svc.door_position(), DoorPosition::Full);
}

#[test]
fn default_position_follows_config() {
    let config = PodConfig {
        default_door_position: DoorPosition::Half,
        ..Default::default()
    };
    let mut svc = PodService::new(config).unwrap();
    svc.restore_door_position(&MockSettings::default());
    assert_eq!(svc.door_position(), DoorPosition::Half);
}

#[test]
fn saves_only_after_a_real_change() {
    let mut svc = service();
    let mut store = MockSettings::default();
    let mut sink = RecordingSink::new();

    assert!(!svc.persist_if_dirty(&mut store));

    // Already Full: accepted, nothing to write.
    svc.handle_command(PodCommand::SetDoorPosition(100), &mut sink);
    assert!(!svc.persist_if_dirty(&mut store));
    assert_eq!(store.saves, 0);

    svc.handle_command(PodCommand::SetDoorPosition(50), &mut sink);
    assert!(svc.persist_if_dirty(&mut store));
    assert_eq!(store.stored, Some(50));
    assert!(!svc.persist_if_dirty(&mut store));
    assert_eq!(store.saves, 1);
}

#[test]
fn failed_save_is_retried() {
    let mut svc = service();
    let mut store = MockSettings {
        fail_save: true,
        ..Default::default()
    };

    assert!(svc.set_door_position(50));
    assert!(!svc.persist_if_dirty(&mut store));
    assert!(svc.is_settings_dirty());

    store.fail_save = false;
    assert!(svc.persist_if_dirty(&mut store));
    assert_eq!(store.stored, Some(50));
    assert!(!svc.is_settings_dirty());
}

#[test]
fn rejected_position_is_reported_and_not_saved() {
    let mut svc = service();
    let mut store = MockSettings::default();
    let mut sink = RecordingSink::new();

    svc.handle_command(PodCommand::SetDoorPosition(75), &mut sink);

    assert_eq!(sink.events, vec![PodEvent::DoorPositionRejected(75)]);
    assert_eq!(svc.door_position(), DoorPosition::Full);
    assert!(!svc.persist_if_dirty(&mut store));
}

#[test]
fn nvs_backend_round_trips_door_position() {
    let mut nvs = NvsAdapter::new().unwrap();
    assert_eq!(nvs.load_door_position().unwrap(), None);

    let mut svc = service();
    assert!(svc.set_door_position(50));
    assert!(svc.persist_if_dirty(&mut nvs));
    assert_eq!(nvs.load_door_position().unwrap(), Some(50));

    let mut rebooted = service();
    rebooted.restore_door_position(&nvs);
    assert_eq!(rebooted.door_position(), DoorPosition::Half);
}

#[test]
fn nvs_garbage_byte_is_ignored_on_restore() {
    let mut nvs = NvsAdapter::new().unwrap();
    nvs.sim_write_raw(0xFF);

    let mut svc = service();
    svc.restore_door_position(&nvs);
    assert_eq!(svc.door_position(), DoorPosition::Full);
}
