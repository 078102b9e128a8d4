//! GPIO assignments for the ZBrain board.
//!
//! Single source of truth: `main.rs` binds drivers to these numbers and
//! nothing else hard-codes a pin.  Index in each array is the logical id
//! used on the bus and over the radio.

// ---------------------------------------------------------------------------
// Push buttons (active low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_GPIOS: [i32; crate::drivers::button::BUTTON_COUNT] = [4, 5, 6, 7];

// ---------------------------------------------------------------------------
// Indicator LEDs (active high)
// ---------------------------------------------------------------------------

/// LED 3 doubles as the reset acknowledgment and catch-all mode indicator.
pub const LED_GPIOS: [i32; crate::drivers::led_bank::LED_COUNT] = [15, 16, 17, 18];
