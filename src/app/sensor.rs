//! Sensor task: turns button edges into bus events.
//!
//! Polls the [`ButtonScanner`] at a fixed interval and publishes one
//! `ButtonEvent` per detected edge with source `Sensor`.  Publishing never
//! blocks; a full bus drops the event and the loop carries on.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::bus::Bus;
use crate::drivers::button::{BUTTON_COUNT, ButtonScanner};
use crate::message::{Message, Source};

use super::ports::Clock;

pub struct SensorTask<'b, P, C, D, const N: usize = BUTTON_COUNT> {
    bus: &'b Bus,
    scanner: ButtonScanner<P, N>,
    clock: C,
    delay: D,
    poll_ms: u32,
}

impl<'b, P, C, D, const N: usize> SensorTask<'b, P, C, D, N>
where
    P: InputPin,
    C: Clock,
    D: DelayNs,
{
    pub fn new(bus: &'b Bus, scanner: ButtonScanner<P, N>, clock: C, delay: D, poll_ms: u32) -> Self {
        Self {
            bus,
            scanner,
            clock,
            delay,
            poll_ms,
        }
    }

    pub fn run(mut self) -> ! {
        info!("sensor polling {} buttons every {}ms", N, self.poll_ms);
        loop {
            self.poll();
            self.delay.delay_ms(self.poll_ms);
        }
    }

    /// Scan once and publish every edge.  Returns how many were accepted.
    pub fn poll(&mut self) -> usize {
        let mut accepted = 0;
        for edge in self.scanner.scan() {
            let msg = Message::button(
                Source::Sensor,
                self.clock.now_ms(),
                edge.button_id,
                edge.pressed,
            );
            match self.bus.publish(msg) {
                Ok(()) => {
                    debug!("btn {} {}", edge.button_id, if edge.pressed { "down" } else { "up" });
                    accepted += 1;
                }
                Err(e) => warn!(
                    "btn {} event lost: {} (drops={})",
                    edge.button_id,
                    e,
                    self.bus.drop_count()
                ),
            }
        }
        accepted
    }
}
