//! Actuator: executes routed commands against the LED bank.
//!
//! The bank sits behind an `Arc<Mutex<_>>` so the controller's direct
//! toggle ([`ToggleHandle`]) and this task's command execution never
//! interleave a read-modify-write.  The lock is held per LED write only,
//! never across the acknowledgment pulse, so direct toggles keep working
//! while the actuator is blocked in [`DelayNs::delay_ms`].
//!
//! | Command       | Effect                                              |
//! |---------------|-----------------------------------------------------|
//! | LedToggle(id) | invert LED `id`                                     |
//! | LedSet(id,on) | drive LED `id`                                      |
//! | SetMode(m)    | all off, then LED 0/1/2 for Idle/Active/Diag, else 3|
//! | ResetStats    | LED 3 on, hold for the pulse, LED 3 off             |

use std::sync::{Arc, Mutex, MutexGuard};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, error, info, warn};

use crate::bus::{Bus, Deadline};
use crate::drivers::led_bank::{LED_COUNT, LedBank};
use crate::error::BusError;
use crate::message::{Command, Destination, Message};

use super::mode::Mode;
use super::ports::DirectToggle;

/// LED used for the reset acknowledgment pulse and the catch-all mode.
const ACK_LED: u8 = 3;

type Shared<P, const N: usize> = Arc<Mutex<LedBank<P, N>>>;

fn lock<P, const N: usize>(leds: &Mutex<LedBank<P, N>>) -> MutexGuard<'_, LedBank<P, N>> {
    // A panic mid-write leaves at worst one stale state bit.
    leds.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Indicator LED for a raw mode value.
pub const fn mode_indicator(raw: u32) -> u8 {
    match Mode::from_u32(raw) {
        Some(Mode::Idle) => 0,
        Some(Mode::Active) => 1,
        Some(Mode::Diag) => 2,
        None => ACK_LED,
    }
}

// ───────────────────────────────────────────────────────────────
// Direct toggle handle
// ───────────────────────────────────────────────────────────────

/// Synchronous toggle into the actuator's LED bank, handed to the controller.
pub struct ToggleHandle<P, const N: usize = LED_COUNT> {
    leds: Shared<P, N>,
}

impl<P, const N: usize> Clone for ToggleHandle<P, N> {
    fn clone(&self) -> Self {
        Self {
            leds: Arc::clone(&self.leds),
        }
    }
}

impl<P: OutputPin, const N: usize> DirectToggle for ToggleHandle<P, N> {
    fn toggle(&mut self, led_id: u8) {
        lock(&self.leds).toggle(led_id);
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator task
// ───────────────────────────────────────────────────────────────

pub struct Actuator<'b, P, D, const N: usize = LED_COUNT> {
    bus: &'b Bus,
    leds: Shared<P, N>,
    delay: D,
    pulse_ms: u32,
}

impl<'b, P, D, const N: usize> Actuator<'b, P, D, N>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(bus: &'b Bus, leds: LedBank<P, N>, delay: D, pulse_ms: u32) -> Self {
        Self {
            bus,
            leds: Arc::new(Mutex::new(leds)),
            delay,
            pulse_ms,
        }
    }

    pub fn toggle_handle(&self) -> ToggleHandle<P, N> {
        ToggleHandle {
            leds: Arc::clone(&self.leds),
        }
    }

    /// Drive every output low.  Call once before the first command.
    pub fn start(&self) {
        lock(&self.leds).init_all_off();
        info!("actuator ready ({} LEDs, pulse={}ms)", N, self.pulse_ms);
    }

    pub fn run(mut self) -> ! {
        self.start();
        loop {
            if let Err(e) = self.step(Deadline::Forever) {
                error!("actuator receive failed: {}", e);
            }
        }
    }

    /// Receive one routed command and execute it.
    pub fn step(&mut self, deadline: Deadline) -> Result<(), BusError> {
        let msg = self.bus.receive_for(Destination::Actuator, deadline)?;
        self.handle(msg);
        Ok(())
    }

    /// Execute a message.  Anything other than a Command is ignored.
    pub fn handle(&mut self, msg: Message) {
        match msg.as_command() {
            Some(command) => self.execute(command),
            None => debug!("actuator ignoring {}", msg),
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::LedToggle { led } => lock(&self.leds).toggle(led),
            Command::LedSet { led, on } => {
                if let Err(e) = lock(&self.leds).apply(led, on) {
                    warn!("LED{} set failed: {}", led, e);
                }
            }
            Command::SetMode(raw) => {
                let indicator = mode_indicator(raw);
                let mut leds = lock(&self.leds);
                leds.all_off();
                if let Err(e) = leds.apply(indicator, true) {
                    warn!("mode indicator LED{} failed: {}", indicator, e);
                }
                debug!("mode {} -> LED{}", raw, indicator);
            }
            Command::ResetStats => {
                if let Err(e) = lock(&self.leds).apply(ACK_LED, true) {
                    warn!("reset ack on failed: {}", e);
                }
                self.delay.delay_ms(self.pulse_ms);
                if let Err(e) = lock(&self.leds).apply(ACK_LED, false) {
                    warn!("reset ack off failed: {}", e);
                }
                info!("stats reset acknowledged");
            }
        }
    }

    pub fn led_states(&self) -> [bool; N] {
        lock(&self.leds).states()
    }
}
