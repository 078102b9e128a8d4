//! Indicator LED bank.
//!
//! Four discrete LEDs, each on its own GPIO.  The bank records the last
//! successfully written level per LED; a failed or rejected write leaves
//! the record untouched.
//!
//! ## Dual-target design
//!
//! Outputs are any `embedded_hal::digital::OutputPin`: `PinDriver` on
//! ESP-IDF, recording mocks on the host.  An output that failed to
//! configure is held as `None` and reports `DeviceNotReady`.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::error::LedError;

/// Number of indicator LEDs on the board.
pub const LED_COUNT: usize = 4;

pub struct LedBank<P, const N: usize = LED_COUNT> {
    outputs: [Option<P>; N],
    state: [bool; N],
}

impl<P: OutputPin, const N: usize> LedBank<P, N> {
    pub fn new(outputs: [Option<P>; N]) -> Self {
        Self {
            outputs,
            state: [false; N],
        }
    }

    /// Drive every ready output low.  Missing outputs are logged and skipped.
    pub fn init_all_off(&mut self) {
        for id in 0..N {
            match self.apply(id as u8, false) {
                Ok(()) => {}
                Err(e) => warn!("LED{} init skipped: {}", id, e),
            }
        }
    }

    /// Range- and readiness-checked write.  Records the new level on success.
    pub fn apply(&mut self, id: u8, on: bool) -> Result<(), LedError> {
        let idx = id as usize;
        let slot = self.outputs.get_mut(idx).ok_or(LedError::InvalidId)?;
        let pin = slot.as_mut().ok_or(LedError::DeviceNotReady)?;

        let written = if on { pin.set_high() } else { pin.set_low() };
        written.map_err(|_| LedError::WriteFailed)?;

        self.state[idx] = on;
        Ok(())
    }

    /// Invert one LED.  Out-of-range ids are ignored; write errors are logged.
    pub fn toggle(&mut self, id: u8) {
        let Some(current) = self.is_on(id) else {
            return;
        };
        if let Err(e) = self.apply(id, !current) {
            warn!("LED{} toggle failed: {}", id, e);
            return;
        }
        info!("LED{} toggle -> {}", id, u8::from(!current));
    }

    /// Drive every ready output low.  Returns how many outputs were skipped.
    pub fn all_off(&mut self) -> usize {
        let mut skipped = 0;
        for id in 0..N {
            if let Err(e) = self.apply(id as u8, false) {
                warn!("LED{} off skipped: {}", id, e);
                skipped += 1;
            }
        }
        skipped
    }

    /// Recorded level, or `None` for an out-of-range id.
    pub fn is_on(&self, id: u8) -> Option<bool> {
        self.state.get(id as usize).copied()
    }

    pub fn states(&self) -> [bool; N] {
        self.state
    }
}
