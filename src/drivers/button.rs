//! Polled push-button scanner with edge detection.
//!
//! ## Hardware
//!
//! Four active-low momentary switches with pull-ups: a low level means
//! pressed.  The sensor task calls [`ButtonScanner::scan`] at a fixed poll
//! interval; bounce is absorbed by that interval rather than filtered here.
//!
//! ## Edge detection
//!
//! | Previous level | Current level | Edge            |
//! |----------------|---------------|-----------------|
//! | high           | low           | pressed = true  |
//! | low            | high          | pressed = false |
//! | unchanged      | unchanged     | none            |

use embedded_hal::digital::InputPin;
use heapless::Vec;
use log::warn;

/// Number of buttons on the board.
pub const BUTTON_COUNT: usize = 4;

/// A change in one input's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub button_id: u8,
    pub pressed: bool,
}

pub struct ButtonScanner<P, const N: usize = BUTTON_COUNT> {
    inputs: [P; N],
    /// Last observed "is low" per input.
    last_low: [bool; N],
}

impl<P: InputPin, const N: usize> ButtonScanner<P, N> {
    /// Take ownership of the inputs and latch their current levels, so a
    /// button held at boot does not produce a spurious press.
    pub fn new(mut inputs: [P; N]) -> Self {
        let mut last_low = [false; N];
        for (id, input) in inputs.iter_mut().enumerate() {
            last_low[id] = match input.is_low() {
                Ok(low) => low,
                Err(_) => {
                    warn!("button {} initial read failed, assuming released", id);
                    false
                }
            };
        }
        Self { inputs, last_low }
    }

    /// Read every input once and report the edges seen since the last scan,
    /// in ascending button id order.
    pub fn scan(&mut self) -> Vec<Edge, N> {
        let mut edges = Vec::new();
        for (id, input) in self.inputs.iter_mut().enumerate() {
            let Ok(low) = input.is_low() else {
                warn!("button {} read failed", id);
                continue;
            };
            if low != self.last_low[id] {
                self.last_low[id] = low;
                // Capacity equals N, one edge per input at most.
                let _ = edges.push(Edge {
                    button_id: id as u8,
                    pressed: low,
                });
            }
        }
        edges
    }

    /// Whether a button is currently held, per the last scan.
    pub fn is_pressed(&self, button_id: u8) -> bool {
        self.last_low.get(button_id as usize).copied().unwrap_or(false)
    }
}
