//! GPIO-level drivers and task plumbing.

pub mod button;
pub mod led_bank;
pub mod task_pin;
