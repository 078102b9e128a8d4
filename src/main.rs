//! ZBrain firmware entry point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  PinDriver (buttons, LEDs)   FreeRtos delay   MonotonicClock │
//! │  RadioLink + NotifySink (BLE event/command characteristics)  │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │   Sensor ──▶ ┌─────┐ ──▶ Controller ──▶ ┌─────┐ ──▶ Actuator │
//! │              │ Bus │ ◀── RadioLink      │ Bus │              │
//! │              └─────┘                    └─────┘              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, Input, Output, PinDriver, Pull};
use log::{info, warn};

use zbrain::adapters::ble::{LogNotifySink, RadioLink};
use zbrain::adapters::time::MonotonicClock;
use zbrain::bus::Bus;
use zbrain::config::SystemConfig;
use zbrain::pins;
use zbrain::runtime::{self, Board};

static BUS: Bus = Bus::new();
/// Radio protocol state.  The GATT server that drives its callbacks is
/// attached outside this crate; until then notifications are skipped.
static RADIO: RadioLink<LogNotifySink> = RadioLink::new(LogNotifySink);

type Button = PinDriver<'static, AnyIOPin, Input>;
type Led = PinDriver<'static, AnyIOPin, Output>;

fn button(gpio: i32) -> Result<Button> {
    // SAFETY: each GPIO number in `pins` is bound exactly once, here.
    let mut drv = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    drv.set_pull(Pull::Up)?;
    Ok(drv)
}

fn led(id: usize, gpio: i32) -> Option<Led> {
    // SAFETY: as above.
    match PinDriver::output(unsafe { AnyIOPin::new(gpio) }) {
        Ok(drv) => Some(drv),
        Err(e) => {
            warn!("LED{} (GPIO{}) not ready: {}", id, gpio, e);
            None
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ZBrain v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Board I/O ──────────────────────────────────────────
    let buttons: [Button; pins::BUTTON_GPIOS.len()] = pins::BUTTON_GPIOS
        .iter()
        .map(|gpio| button(*gpio))
        .collect::<Result<Vec<_>>>()?
        .try_into()
        .map_err(|_| anyhow::anyhow!("button table incomplete"))?;
    let leds = core::array::from_fn(|id| led(id, pins::LED_GPIOS[id]));

    let board = Board {
        buttons,
        leds,
        sensor_delay: FreeRtos,
        actuator_delay: FreeRtos,
    };

    // ── 3. Tasks ──────────────────────────────────────────────
    let tasks = runtime::spawn_all(&config, &BUS, board, &RADIO, MonotonicClock::new())?;
    info!(
        "BLE link '{}' waiting for the radio stack (pri={})",
        config.device_name, config.radio_priority
    );

    // The tasks never return; joining parks the main task for good.
    let _ = tasks.controller.join();
    Ok(())
}
