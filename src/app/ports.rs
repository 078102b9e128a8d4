//! Port traits: the boundary between the task logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller / Actuator / Sensor
//! ```
//!
//! GPIO goes through `embedded-hal` directly (`InputPin`, `OutputPin`,
//! `DelayNs`); the traits here cover what `embedded-hal` has no word for.

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic uptime source used to stamp messages.
pub trait Clock {
    /// Milliseconds since boot, truncated to `u32`.
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

// ───────────────────────────────────────────────────────────────
// Radio notifier (controller → radio side channel)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget button notification toward the radio link.
///
/// Called synchronously from the controller for every button event, press
/// and release alike.  Implementations must not block.
pub trait ButtonNotifier {
    fn notify_button(&mut self, button_id: u8, pressed: bool, timestamp_ms: u32);
}

/// Raw notification transport under the radio link (a GATT notify on the
/// event characteristic in production).
pub trait NotifySink {
    fn send(&self, frame: &[u8]) -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Direct toggle (controller → actuator, bypassing the bus)
// ───────────────────────────────────────────────────────────────

/// The one documented synchronous cross-task call.
///
/// Out-of-range ids are ignored; nothing is reported back.
pub trait DirectToggle {
    fn toggle(&mut self, led_id: u8);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`NotifySink::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The stack refused the notification (buffers exhausted, link lost).
    Rejected(i32),
}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Rejected(rc) => write!(f, "notify rejected (rc={})", rc),
        }
    }
}
