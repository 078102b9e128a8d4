//! Controller: the dispatch state machine.
//!
//! Single consumer of every message that needs a routing decision, and the
//! only writer of [`Mode`] and the button press counters.
//!
//! ```text
//!                 ┌───────────────────────────────┐
//!  ButtonEvent ──▶│ notify radio (press+release)  │
//!                 │ press: count, per-id action   │──▶ DirectToggle (LED 0..3)
//!                 │                               │──▶ Bus: SetMode / ResetStats
//!  Command ──────▶│ route(source, id)             │
//!                 │   HandleLocally → set_mode    │
//!                 │   Forward       → bus (once)  │──▶ Bus ──▶ Actuator
//!  Status ───────▶│ ignored                       │
//!                 └───────────────────────────────┘
//! ```
//!
//! | Button | Action on press                                   |
//! |--------|---------------------------------------------------|
//! | 0      | toggle LED 0                                      |
//! | 1      | toggle LED 1                                      |
//! | 2      | toggle LED 2, advance mode                        |
//! | 3      | toggle LED 3, zero counters, publish ResetStats   |
//! | other  | count only                                        |

use log::{debug, error, info, warn};

use crate::bus::{Bus, Deadline};
use crate::error::BusError;
use crate::message::{ButtonEvent, Command, Destination, Message, Payload, Source};

use super::mode::Mode;
use super::ports::{ButtonNotifier, Clock, DirectToggle};
use super::routing::{Route, route};

/// Press counter slots.  Ids at or above this are never counted.
pub const COUNTER_SLOTS: usize = 16;

pub struct Controller<'b, N, T, C> {
    bus: &'b Bus,
    notifier: N,
    leds: T,
    clock: C,
    mode: Mode,
    presses: [u32; COUNTER_SLOTS],
}

impl<'b, N, T, C> Controller<'b, N, T, C>
where
    N: ButtonNotifier,
    T: DirectToggle,
    C: Clock,
{
    pub fn new(bus: &'b Bus, notifier: N, leds: T, clock: C) -> Self {
        Self {
            bus,
            notifier,
            leds,
            clock,
            mode: Mode::Idle,
            presses: [0; COUNTER_SLOTS],
        }
    }

    // ── Loop ──────────────────────────────────────────────────

    /// Block forever on the bus, dispatching each message.  Receive
    /// failures are logged and the wait is retried.
    pub fn run(mut self) -> ! {
        info!("controller start (mode={})", self.mode.name());
        loop {
            if let Err(e) = self.step(Deadline::Forever) {
                error!("controller receive failed: {}", e);
            }
        }
    }

    /// Receive one message addressed to the controller and dispatch it.
    pub fn step(&mut self, deadline: Deadline) -> Result<(), BusError> {
        let msg = self.bus.receive_for(Destination::Controller, deadline)?;
        self.handle(msg);
        Ok(())
    }

    pub fn handle(&mut self, msg: Message) {
        debug!("controller got {}", msg);
        match msg.payload {
            Payload::ButtonEvent(event) => self.handle_button(event),
            Payload::Command(payload) => {
                if msg.is_forwarded() {
                    // Already routed once; republishing again would loop.
                    warn!("controller saw forwarded {}, ignoring", msg);
                    return;
                }
                match route(msg.source, payload.command_id) {
                    Route::HandleLocally => {
                        if let Command::SetMode(raw) = Command::decode(payload) {
                            self.set_mode(raw);
                        }
                    }
                    Route::Forward => self.forward(msg),
                }
            }
            Payload::Status(_) => {}
        }
    }

    // ── Mode ──────────────────────────────────────────────────

    /// Change mode and broadcast it.  Out-of-range values and the current
    /// mode are no-ops: nothing changes and nothing is published.
    pub fn set_mode(&mut self, requested: u32) {
        let Some(mode) = Mode::from_u32(requested) else {
            debug!("set_mode({}) out of range, ignored", requested);
            return;
        };
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        info!("mode -> {}", mode.name());
        self.publish_command(Command::set_mode(mode));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Presses counted for `button_id`; zero for ids without a slot.
    pub fn press_count(&self, button_id: u8) -> u32 {
        self.presses.get(button_id as usize).copied().unwrap_or(0)
    }

    pub fn press_counts(&self) -> &[u32; COUNTER_SLOTS] {
        &self.presses
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn leds(&self) -> &T {
        &self.leds
    }

    // ── Internal ──────────────────────────────────────────────

    fn handle_button(&mut self, event: ButtonEvent) {
        let ButtonEvent { button_id, pressed } = event;
        debug!("button event: id={} pressed={}", button_id, pressed);

        self.notifier
            .notify_button(button_id, pressed, self.clock.now_ms());

        if !pressed {
            return;
        }

        if let Some(count) = self.presses.get_mut(button_id as usize) {
            *count = count.wrapping_add(1);
        }

        match button_id {
            0 | 1 => {
                info!("button {}: toggling LED", button_id);
                self.leds.toggle(button_id);
            }
            2 => {
                self.leds.toggle(2);
                self.set_mode(self.mode.next() as u32);
            }
            3 => {
                self.leds.toggle(3);
                self.presses = [0; COUNTER_SLOTS];
                self.publish_command(Command::ResetStats);
                info!("stats reset");
            }
            _ => info!(
                "btn {} pressed (count={})",
                button_id,
                self.press_count(button_id)
            ),
        }
    }

    fn forward(&self, msg: Message) {
        debug!("forwarding {}", msg);
        if self.bus.publish(msg.into_forwarded()).is_err() {
            warn!("forward dropped, bus full (drops={})", self.bus.drop_count());
        }
    }

    fn publish_command(&self, command: Command) {
        let msg = Message::command(Source::Controller, self.clock.now_ms(), command);
        match self.bus.publish(msg) {
            Ok(()) => debug!("publish_cmd {:?}", command),
            Err(_) => error!(
                "cmd publish failed! drops={}",
                self.bus.drop_count()
            ),
        }
    }
}
