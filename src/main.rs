//! SolePod Firmware: Main Entry Point
//!
//! Hexagonal architecture driven by a cooperative, fixed-cadence poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   Esp32Time       │
//! │  (Sensor+Actuator) (EventSink)    (Settings)   (uptime)        │
//! │  DoorButton ──▶ POD_REQUESTS (lock-free mailbox)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              PodService (pure logic)                   │    │
//! │  │  Decoder · Sequencer · Stall interlock                 │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler: safety 50 ms · control 10 ms · status 500 ms       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{
    AnyIOPin, AnyOutputPin, IOPin, Input, Output, OutputPin, Pin, PinDriver, Pull,
};
use esp_idf_svc::hal::peripherals::Peripherals;

use solepod::adapters::hardware::HardwareAdapter;
use solepod::adapters::log_sink::LogEventSink;
use solepod::adapters::nvs::NvsAdapter;
use solepod::adapters::time::Esp32TimeAdapter;
use solepod::app::commands::PodCommand;
use solepod::app::events::PodEvent;
use solepod::app::ports::EventSink;
use solepod::app::service::PodService;
use solepod::config::PodConfig;
use solepod::drivers::button::DoorButton;
use solepod::drivers::hw_init;
use solepod::drivers::motor::PodMotors;
use solepod::events::POD_REQUESTS;
use solepod::pins;
use solepod::scheduler::{Scheduler, Task};
use solepod::sensors::SensorHub;
use solepod::sensors::limit_switches::LimitSwitches;

type InPin = PinDriver<'static, AnyIOPin, Input>;
type OutPin = PinDriver<'static, AnyOutputPin, Output>;

/// Pull-up input for an active-low contact.
fn pull_up_input(pin: AnyIOPin, expected_gpio: i32) -> Result<InPin> {
    debug_assert_eq!(pin.pin(), expected_gpio, "board wiring out of sync with pins.rs");
    let mut drv = PinDriver::input(pin)?;
    drv.set_pull(Pull::Up)?;
    Ok(drv)
}

/// Push-pull output, driven LOW before it is handed out.
fn low_output(pin: AnyOutputPin, expected_gpio: i32) -> Result<OutPin> {
    debug_assert_eq!(pin.pin(), expected_gpio, "board wiring out of sync with pins.rs");
    let mut drv = PinDriver::output(pin)?;
    drv.set_low()?;
    Ok(drv)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SolePod v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let io = peripherals.pins;

    // ── 2. Motors first, so nothing moves during the rest of boot ─
    let motors = PodMotors::new(
        low_output(io.gpio46.downgrade_output(), pins::DOOR_MOTOR_EN_GPIO)?,
        low_output(io.gpio3.downgrade_output(), pins::DOOR_MOTOR_DIR_GPIO)?,
        low_output(io.gpio10.downgrade_output(), pins::TRAY_MOTOR_EN_GPIO)?,
        low_output(io.gpio11.downgrade_output(), pins::TRAY_MOTOR_DIR_GPIO)?,
    );

    // ── 3. Inputs ─────────────────────────────────────────────
    let switches = LimitSwitches::new(
        pull_up_input(io.gpio45.downgrade(), pins::DOOR_CLOSED_SWITCH_GPIO)?,
        pull_up_input(io.gpio48.downgrade(), pins::DOOR_OPENED_SWITCH_GPIO)?,
        pull_up_input(io.gpio35.downgrade(), pins::TRAY_CLOSED_SWITCH_GPIO)?,
        pull_up_input(io.gpio36.downgrade(), pins::TRAY_OPENED_SWITCH_GPIO)?,
    );
    let mut button = DoorButton::new(pull_up_input(io.gpio47.downgrade(), pins::DOOR_BUTTON_GPIO)?);

    // No stall sense, no motion: boot stops here with the motors off.
    hw_init::init_stall_adc()?;

    let mut hw = HardwareAdapter::new(SensorHub::new(switches), motors);

    // ── 4. Settings ───────────────────────────────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), door position will not persist", e);
            None
        }
    };

    // ── 5. Pod service ────────────────────────────────────────
    let config = PodConfig::default();
    let mut pod = PodService::new(config.clone())?;
    if let Some(store) = nvs.as_ref() {
        pod.restore_door_position(store);
    }

    let mut log_sink = LogEventSink::new();
    pod.start(&mut hw, &mut log_sink);

    let clock = Esp32TimeAdapter::new();
    let mut sched = Scheduler::new(&config);

    info!("System ready. Entering poll loop.");

    // ── 6. Poll loop ──────────────────────────────────────────
    loop {
        let now_ms = clock.uptime_ms();

        for task in sched.poll(now_ms) {
            match task {
                Task::SafetyCheck => {
                    pod.safety_tick(&mut hw, &mut log_sink);
                }

                Task::ControlCycle => {
                    match button.poll(now_ms) {
                        Ok(true) => {
                            if !POD_REQUESTS.push(PodCommand::ToggleTarget) {
                                warn!("request queue full, button press dropped");
                            }
                        }
                        Ok(false) => {}
                        Err(e) => warn!("door button: {}", e),
                    }

                    POD_REQUESTS.drain(|cmd| pod.handle_command(cmd, &mut log_sink));
                    pod.tick(&mut hw, &mut log_sink);

                    if let Some(store) = nvs.as_mut() {
                        pod.persist_if_dirty(store);
                    }
                }

                Task::StatusReport => {
                    log_sink.emit(&PodEvent::Status(pod.build_status()));
                }
            }
        }

        let idle_ms = sched.ms_until_next(clock.uptime_ms()).max(1);
        FreeRtos::delay_ms(idle_ms as u32);
    }
}
