//! Task wiring.
//!
//! ```text
//!   Core 1 (APP_CPU)
//!   ├── sensor      pri 9   ButtonScanner ──▶ Bus
//!   ├── controller  pri 8   Bus ──▶ mode/counters ──▶ Bus, ToggleHandle, RadioLink
//!   └── actuator    pri 6   Bus ──▶ LedBank
//! ```
//!
//! The radio stack runs its own task on core 0 and only touches the bus
//! through [`crate::adapters::ble::RadioLink::on_command_write`].

use std::thread::JoinHandle;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::info;

use crate::app::actuator::Actuator;
use crate::app::controller::Controller;
use crate::app::ports::{ButtonNotifier, Clock};
use crate::app::sensor::SensorTask;
use crate::bus::Bus;
use crate::config::SystemConfig;
use crate::drivers::button::{BUTTON_COUNT, ButtonScanner};
use crate::drivers::led_bank::{LED_COUNT, LedBank};
use crate::drivers::task_pin::{Core, TaskSpec, spawn_task};
use crate::error::Error;

/// Board I/O handed to [`spawn_all`].
pub struct Board<I, O, DS, DA> {
    pub buttons: [I; BUTTON_COUNT],
    /// `None` marks an output that failed to configure.
    pub leds: [Option<O>; LED_COUNT],
    pub sensor_delay: DS,
    pub actuator_delay: DA,
}

/// Handles of the running tasks.  None of them ever returns.
pub struct Tasks {
    pub sensor: JoinHandle<()>,
    pub controller: JoinHandle<()>,
    pub actuator: JoinHandle<()>,
}

/// Validate `config`, then start the actuator, controller and sensor in
/// that order so every consumer is waiting before the first event.
pub fn spawn_all<I, O, DS, DA, N, C>(
    config: &SystemConfig,
    bus: &'static Bus,
    board: Board<I, O, DS, DA>,
    notifier: N,
    clock: C,
) -> Result<Tasks, Error>
where
    I: InputPin + Send + 'static,
    O: OutputPin + Send + 'static,
    DS: DelayNs + Send + 'static,
    DA: DelayNs + Send + 'static,
    N: ButtonNotifier + Send + 'static,
    C: Clock + Clone + Send + 'static,
{
    config.validate()?;

    let Board {
        buttons,
        leds,
        sensor_delay,
        actuator_delay,
    } = board;

    let actuator = Actuator::new(bus, LedBank::new(leds), actuator_delay, config.reset_ack_pulse_ms);
    let toggle = actuator.toggle_handle();
    let controller = Controller::new(bus, notifier, toggle, clock.clone());
    let sensor = SensorTask::new(
        bus,
        ButtonScanner::new(buttons),
        clock,
        sensor_delay,
        config.sensor_poll_interval_ms,
    );

    let pinned = |name: &'static str, priority: u8| TaskSpec {
        name,
        core: Core::App,
        priority,
        stack_kb: config.task_stack_kb,
    };

    let actuator = spawn_task(pinned("actuator\0", config.actuator_priority), move || {
        actuator.run();
    })?;
    let controller = spawn_task(pinned("controller\0", config.controller_priority), move || {
        controller.run();
    })?;
    let sensor = spawn_task(pinned("sensor\0", config.sensor_priority), move || {
        sensor.run();
    })?;

    info!("all tasks running (bus capacity={})", bus.capacity());
    Ok(Tasks {
        sensor,
        controller,
        actuator,
    })
}
