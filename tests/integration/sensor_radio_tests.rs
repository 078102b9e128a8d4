//! Bus producers: the polled sensor task and the radio link.

use super::mock_hw::{ManualClock, RecordingDelay, RecordingNotifier, RecordingSink, ScriptedButton};

use zbrain::adapters::ble::RadioLink;
use zbrain::app::controller::Controller;
use zbrain::app::mode::Mode;
use zbrain::app::ports::DirectToggle;
use zbrain::app::sensor::SensorTask;
use zbrain::bus::{Bus, Deadline};
use zbrain::drivers::button::ButtonScanner;
use zbrain::error::{BusError, FrameError};
use zbrain::message::{ButtonEvent, Command, Message, Payload, Source};

fn buttons() -> ([ScriptedButton; 4], [ScriptedButton; 4]) {
    let probes: [ScriptedButton; 4] = Default::default();
    (probes.clone(), probes)
}

type TestSensor<'b> = SensorTask<'b, ScriptedButton, ManualClock, RecordingDelay>;

fn sensor<'b>(bus: &'b Bus, clock: &ManualClock) -> (TestSensor<'b>, [ScriptedButton; 4]) {
    let (lines, probes) = buttons();
    let task = SensorTask::new(
        bus,
        ButtonScanner::new(lines),
        clock.clone(),
        RecordingDelay::default(),
        10,
    );
    (task, probes)
}

fn button_events(bus: &Bus) -> Vec<(u8, bool, u32)> {
    core::iter::from_fn(|| bus.receive(Deadline::NoWait).ok())
        .map(|msg| match msg.payload {
            Payload::ButtonEvent(ButtonEvent { button_id, pressed }) => {
                assert_eq!(msg.source, Source::Sensor);
                (button_id, pressed, msg.timestamp_ms)
            }
            other => panic!("unexpected payload {:?}", other),
        })
        .collect()
}

// ── Sensor ────────────────────────────────────────────────────

#[test]
fn sensor_publishes_one_event_per_edge() {
    let bus: Bus = Bus::new();
    let clock = ManualClock::at(100);
    let (mut task, probes) = sensor(&bus, &clock);

    assert_eq!(task.poll(), 0);

    probes[1].press();
    assert_eq!(task.poll(), 1);
    assert_eq!(task.poll(), 0);

    clock.set(250);
    probes[1].release();
    probes[3].press();
    assert_eq!(task.poll(), 2);

    assert_eq!(
        button_events(&bus),
        [(1, true, 100), (1, false, 250), (3, true, 250)]
    );
}

#[test]
fn sensor_keeps_going_when_the_bus_is_full() {
    let bus: Bus = Bus::new();
    let filler = Message::status(Source::System, 0, 0);
    while bus.publish(filler).is_ok() {}
    let baseline = bus.drop_count();

    let clock = ManualClock::default();
    let (mut task, probes) = sensor(&bus, &clock);
    probes[0].press();
    assert_eq!(task.poll(), 0);
    assert_eq!(bus.drop_count(), baseline + 1);

    // The edge is consumed; no retry on the next scan.
    assert_eq!(task.poll(), 0);
    assert_eq!(bus.drop_count(), baseline + 1);
}

// ── Radio link ────────────────────────────────────────────────

struct NoLeds;
impl DirectToggle for NoLeds {
    fn toggle(&mut self, _led_id: u8) {}
}

#[test]
fn controller_notifies_through_the_radio_link() {
    let bus: Bus = Bus::new();
    let link = RadioLink::new(RecordingSink::default());
    link.on_connected();
    link.on_ccc_changed(0x0001);

    let clock = ManualClock::at(0x0102_0304);
    let mut ctl = Controller::new(&bus, &link, NoLeds, clock);
    ctl.handle(Message::button(Source::Sensor, 0, 2, true));
    ctl.handle(Message::button(Source::Sensor, 0, 2, false));

    assert_eq!(
        link.sink().frames(),
        vec![
            vec![0u8, 2, 1, 0x04, 0x03, 0x02, 0x01],
            vec![0u8, 2, 0, 0x04, 0x03, 0x02, 0x01],
        ]
    );
}

#[test]
fn radio_write_round_trips_through_the_controller() {
    let bus: Bus = Bus::new();
    let link = RadioLink::new(RecordingSink::default());
    let clock = ManualClock::at(42);

    link.on_command_write(&bus, &clock, &[3, 2, 0, 0, 0], 0).unwrap();

    let mut ctl: Controller<'_, RecordingNotifier, NoLeds, ManualClock> =
        Controller::new(&bus, RecordingNotifier::default(), NoLeds, clock.clone());
    ctl.step(Deadline::NoWait).unwrap();
    assert_eq!(ctl.mode(), Mode::Diag);

    let broadcast = bus.receive(Deadline::NoWait).unwrap();
    assert_eq!(broadcast.source, Source::Controller);
    assert_eq!(broadcast.as_command(), Some(Command::SetMode(2)));
}

#[test]
fn malformed_radio_writes_never_reach_the_bus() {
    let bus: Bus = Bus::new();
    let link = RadioLink::new(RecordingSink::default());
    let clock = ManualClock::default();

    assert_eq!(
        link.on_command_write(&bus, &clock, &[1, 0, 0, 0, 0], 2),
        Err(FrameError::InvalidOffset)
    );
    assert_eq!(
        link.on_command_write(&bus, &clock, &[1, 0], 0),
        Err(FrameError::InvalidLength(2))
    );
    assert_eq!(bus.receive(Deadline::NoWait), Err(BusError::Timeout));
}

#[test]
fn unknown_radio_command_is_acked_without_reaching_the_bus() {
    let bus: Bus = Bus::new();
    let link = RadioLink::new(RecordingSink::default());
    let clock = ManualClock::default();

    assert_eq!(link.on_command_write(&bus, &clock, &[0xFF, 0, 0, 0, 0], 0), Ok(None));
    assert_eq!(link.on_command_write(&bus, &clock, &[5, 1, 0, 0, 0], 0), Ok(None));
    assert!(bus.is_empty());
    assert_eq!(bus.drop_count(), 0);

    let accepted = link.on_command_write(&bus, &clock, &[1, 2, 0, 0, 0], 0).unwrap();
    assert_eq!(accepted.map(|p| p.value), Some(2));
    assert_eq!(bus.len(), 1);
}
