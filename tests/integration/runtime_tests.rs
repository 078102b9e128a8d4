//! Full system on host threads: `spawn_all` with mock board I/O.
//!
//! The tasks never return, so each test leaks its bus and leaves the
//! threads parked in `receive` when it finishes.

use std::time::{Duration, Instant};

use super::mock_hw::{
    ManualClock, RecordingDelay, RecordingNotifier, RecordingPin, ScriptedButton, led_outputs,
    levels,
};

use zbrain::adapters::time::StdDelay;
use zbrain::bus::Bus;
use zbrain::config::SystemConfig;
use zbrain::error::Error;
use zbrain::message::{Command, Message, Source};
use zbrain::runtime::{Board, spawn_all};

struct Running {
    bus: &'static Bus,
    buttons: [ScriptedButton; 4],
    leds: [RecordingPin; 4],
    notifier: RecordingNotifier,
    pulse: RecordingDelay,
}

fn start() -> Running {
    let bus: &'static Bus = Box::leak(Box::new(Bus::new()));
    let buttons: [ScriptedButton; 4] = Default::default();
    let (outputs, leds) = led_outputs();
    let notifier = RecordingNotifier::default();
    let pulse = RecordingDelay::default();

    let config = SystemConfig {
        sensor_poll_interval_ms: 1,
        ..SystemConfig::default()
    };
    let board = Board {
        buttons: buttons.clone(),
        leds: outputs,
        sensor_delay: StdDelay,
        actuator_delay: pulse.clone(),
    };
    spawn_all(&config, bus, board, notifier.clone(), ManualClock::at(7)).unwrap();

    Running {
        bus,
        buttons,
        leds,
        notifier,
        pulse,
    }
}

/// Poll `cond` until it holds or two seconds pass.
fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
fn button_press_toggles_led_across_tasks() {
    let sys = start();

    sys.buttons[0].press();
    assert!(eventually(|| sys.leds[0].is_high()));
    sys.buttons[0].release();
    assert!(eventually(|| sys.notifier.notifications().len() == 2));

    let notes = sys.notifier.notifications();
    assert!(notes[0].pressed && !notes[1].pressed);
    assert!(notes.iter().all(|n| n.button_id == 0 && n.timestamp_ms == 7));
}

#[test]
fn mode_button_lights_indicator_and_reset_pulses() {
    let sys = start();

    sys.buttons[2].press();
    assert!(eventually(|| levels(&sys.leds) == [false, true, false, false]));
    sys.buttons[2].release();

    sys.buttons[3].press();
    assert!(eventually(|| sys.pulse.recorded_ms() == [80]));
    assert!(eventually(|| !sys.leds[3].is_high()));
}

#[test]
fn radio_commands_reach_the_outputs() {
    let sys = start();
    sys.bus
        .publish(Message::command(Source::Radio, 1, Command::LedSet { led: 2, on: true }))
        .unwrap();
    assert!(eventually(|| sys.leds[2].is_high()));
    assert!(eventually(|| sys.bus.is_empty()));
}

#[test]
fn invalid_config_spawns_nothing() {
    let bus: &'static Bus = Box::leak(Box::new(Bus::new()));
    let (outputs, _) = led_outputs();
    let config = SystemConfig {
        reset_ack_pulse_ms: 0,
        ..SystemConfig::default()
    };
    let board = Board {
        buttons: <[ScriptedButton; 4]>::default(),
        leds: outputs,
        sensor_delay: StdDelay,
        actuator_delay: StdDelay,
    };
    let result = spawn_all(&config, bus, board, RecordingNotifier::default(), ManualClock::default());
    assert!(matches!(result, Err(Error::Config(_))));
}
