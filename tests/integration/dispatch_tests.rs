//! End-to-end dispatch through one shared bus: producers → Controller →
//! Actuator → LED outputs.  Tasks are stepped by hand with `NoWait`
//! deadlines so every interleaving is deterministic.

use super::mock_hw::{
    ManualClock, RecordingDelay, RecordingNotifier, RecordingPin, led_outputs, levels,
};

use zbrain::app::actuator::{Actuator, ToggleHandle};
use zbrain::app::controller::Controller;
use zbrain::app::mode::Mode;
use zbrain::app::ports::Clock;
use zbrain::bus::{Bus, Deadline};
use zbrain::drivers::led_bank::LedBank;
use zbrain::error::BusError;
use zbrain::message::{Command, CommandId, CommandPayload, Destination, Message, Payload, Source};

type TestController<'b> = Controller<'b, RecordingNotifier, ToggleHandle<RecordingPin>, ManualClock>;
type TestActuator<'b> = Actuator<'b, RecordingPin, RecordingDelay>;

struct Rig<'b> {
    bus: &'b Bus,
    controller: TestController<'b>,
    actuator: TestActuator<'b>,
    leds: [RecordingPin; 4],
    notifier: RecordingNotifier,
    delay: RecordingDelay,
    clock: ManualClock,
}

impl<'b> Rig<'b> {
    fn new(bus: &'b Bus) -> Self {
        let (outputs, leds) = led_outputs();
        let delay = RecordingDelay::default();
        let notifier = RecordingNotifier::default();
        let clock = ManualClock::at(1_000);

        let actuator = Actuator::new(bus, LedBank::new(outputs), delay.clone(), 80);
        actuator.start();
        let controller = Controller::new(bus, notifier.clone(), actuator.toggle_handle(), clock.clone());

        Self {
            bus,
            controller,
            actuator,
            leds,
            notifier,
            delay,
            clock,
        }
    }

    fn press(&self, id: u8) {
        self.bus
            .publish(Message::button(Source::Sensor, self.clock.now_ms(), id, true))
            .unwrap();
        self.bus
            .publish(Message::button(Source::Sensor, self.clock.now_ms(), id, false))
            .unwrap();
    }

    /// Step both consumers until neither finds work.
    fn settle(&mut self) {
        loop {
            let c = self.controller.step(Deadline::NoWait);
            let a = self.actuator.step(Deadline::NoWait);
            if c == Err(BusError::Timeout) && a == Err(BusError::Timeout) {
                break;
            }
        }
    }

    fn levels(&self) -> [bool; 4] {
        levels(&self.leds)
    }
}

#[test]
fn startup_drives_all_outputs_off() {
    let bus: Bus = Bus::new();
    let rig = Rig::new(&bus);
    assert_eq!(rig.levels(), [false; 4]);
    assert!(rig.leds.iter().all(|pin| pin.writes() == 1));
}

#[test]
fn radio_set_mode_lights_the_active_indicator() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);
    rig.bus
        .publish(Message::command(Source::Radio, 5, Command::SetMode(Mode::Active as u32)))
        .unwrap();

    rig.controller.step(Deadline::NoWait).unwrap();
    assert_eq!(rig.controller.mode(), Mode::Active);

    // Exactly one SetMode(Active) is waiting for the actuator.
    assert_eq!(rig.bus.len(), 1);
    let pending = rig
        .bus
        .receive_for(Destination::Actuator, Deadline::NoWait)
        .unwrap();
    assert_eq!(pending.as_command(), Some(Command::SetMode(1)));
    rig.bus.publish(pending).unwrap();

    rig.settle();
    assert_eq!(rig.levels(), [false, true, false, false]);
}

#[test]
fn controller_led_set_reaches_only_its_output() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);
    rig.bus
        .publish(Message::new(
            Source::Controller,
            1,
            Payload::Command(CommandPayload {
                command_id: CommandId::LedSet,
                value: (2 << 8) | 1,
            }),
        ))
        .unwrap();
    rig.settle();
    assert_eq!(rig.levels(), [false, false, true, false]);
}

#[test]
fn radio_led_commands_are_forwarded_once_and_executed() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);
    rig.bus
        .publish(Message::command(Source::Radio, 1, Command::LedToggle { led: 0 }))
        .unwrap();
    rig.bus
        .publish(Message::command(Source::Radio, 2, Command::LedSet { led: 3, on: true }))
        .unwrap();

    // Actuator sees nothing until the controller has routed.
    assert_eq!(rig.actuator.step(Deadline::NoWait), Err(BusError::Timeout));

    rig.settle();
    assert_eq!(rig.levels(), [true, false, false, true]);
    assert!(rig.bus.is_empty());
    assert_eq!(rig.bus.drop_count(), 0);
}

#[test]
fn reset_pulse_blocks_only_the_actuator() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);
    rig.bus
        .publish(Message::command(Source::Controller, 1, Command::ResetStats))
        .unwrap();
    rig.bus
        .publish(Message::command(Source::Controller, 2, Command::LedSet { led: 0, on: true }))
        .unwrap();

    rig.actuator.step(Deadline::NoWait).unwrap();
    assert_eq!(rig.delay.recorded_ms(), [80]);
    assert!(!rig.leds[3].is_high());
    // Startup write, pulse on, pulse off.
    assert_eq!(rig.leds[3].writes(), 3);
    // The LedSet queued behind the pulse is still waiting.
    assert_eq!(rig.levels(), [false; 4]);
    assert_eq!(rig.bus.len(), 1);

    rig.actuator.step(Deadline::NoWait).unwrap();
    assert_eq!(rig.levels(), [true, false, false, false]);
}

#[test]
fn button_presses_drive_leds_mode_and_counters() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);

    rig.press(0);
    rig.press(1);
    rig.press(1);
    rig.settle();
    assert_eq!(rig.levels(), [true, false, false, false]);
    assert_eq!(rig.controller.press_count(0), 1);
    assert_eq!(rig.controller.press_count(1), 2);

    // Button 2: toggle LED 2, then the Active indicator repaints the bank.
    rig.press(2);
    rig.settle();
    assert_eq!(rig.controller.mode(), Mode::Active);
    assert_eq!(rig.levels(), [false, true, false, false]);

    // Button 3: counters cleared, pulse on LED 3.
    rig.press(3);
    rig.settle();
    assert!(rig.controller.press_counts().iter().all(|c| *c == 0));
    assert_eq!(rig.delay.recorded_ms(), [80]);

    // Press + release per button, all reported.
    let notes = rig.notifier.notifications();
    assert_eq!(notes.len(), 10);
    assert_eq!(notes.iter().filter(|n| n.pressed).count(), 5);
    assert!(notes.iter().all(|n| n.timestamp_ms == 1_000));
}

#[test]
fn direct_toggle_and_bus_command_share_led_state() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);
    rig.press(1);
    rig.settle();
    assert!(rig.leds[1].is_high());

    rig.bus
        .publish(Message::command(Source::Radio, 3, Command::LedToggle { led: 1 }))
        .unwrap();
    rig.settle();
    assert!(!rig.leds[1].is_high());
}

#[test]
fn out_of_range_ids_never_touch_outputs() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);
    let before: Vec<u32> = rig.leds.iter().map(RecordingPin::writes).collect();

    rig.press(9);
    rig.bus
        .publish(Message::command(Source::Radio, 1, Command::LedToggle { led: 4 }))
        .unwrap();
    rig.bus
        .publish(Message::command(Source::Radio, 1, Command::LedSet { led: 200, on: true }))
        .unwrap();
    rig.settle();

    let after: Vec<u32> = rig.leds.iter().map(RecordingPin::writes).collect();
    assert_eq!(before, after);
    assert_eq!(rig.controller.press_count(9), 1);
}

#[test]
fn out_of_range_mode_from_another_source_selects_catch_all() {
    let bus: Bus = Bus::new();
    let mut rig = Rig::new(&bus);
    rig.bus
        .publish(Message::command(Source::System, 1, Command::SetMode(7)))
        .unwrap();
    rig.settle();
    // The controller never applies it; the actuator shows the catch-all.
    assert_eq!(rig.controller.mode(), Mode::Idle);
    assert_eq!(rig.levels(), [false, false, false, true]);
}
