//! System configuration parameters
//!
//! Tunable timing and task parameters for the ZBrain firmware.  Queue depth
//! and array sizes are compile-time constants and do not appear here.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Longest name that fits a legacy advertising packet alongside the flags
/// and 128-bit service UUID.
pub const MAX_DEVICE_NAME_LEN: usize = 29;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Button polling period (milliseconds)
    pub sensor_poll_interval_ms: u32,
    /// Hold time of the reset acknowledgment pulse (milliseconds)
    pub reset_ack_pulse_ms: u32,

    // --- Task priorities (FreeRTOS: higher runs first) ---
    pub sensor_priority: u8,
    pub controller_priority: u8,
    pub radio_priority: u8,
    pub actuator_priority: u8,
    pub comms_priority: u8,
    /// Stack per spawned task (KiB)
    pub task_stack_kb: usize,

    // --- Radio ---
    /// Advertised device name
    pub device_name: heapless::String<MAX_DEVICE_NAME_LEN>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        let _ = device_name.push_str("zbrain");
        Self {
            // Timing
            sensor_poll_interval_ms: 10, // 100 Hz
            reset_ack_pulse_ms: 80,

            // Priorities
            sensor_priority: 9,
            controller_priority: 8,
            radio_priority: 7,
            actuator_priority: 6,
            comms_priority: 5,
            task_stack_kb: 8,

            device_name,
        }
    }
}

impl SystemConfig {
    /// Reject values that would stall a task or invert the priority order.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sensor_poll_interval_ms == 0 {
            return Err(Error::Config("sensor_poll_interval_ms must be > 0"));
        }
        if self.reset_ack_pulse_ms == 0 {
            return Err(Error::Config("reset_ack_pulse_ms must be > 0"));
        }
        if self.task_stack_kb == 0 {
            return Err(Error::Config("task_stack_kb must be > 0"));
        }
        if self.device_name.is_empty() {
            return Err(Error::Config("device_name must not be empty"));
        }
        let ordered = self.sensor_priority > self.controller_priority
            && self.controller_priority > self.radio_priority
            && self.radio_priority > self.actuator_priority
            && self.actuator_priority > self.comms_priority;
        if !ordered {
            return Err(Error::Config(
                "priorities must run sensor > controller > radio > actuator > comms",
            ));
        }
        Ok(())
    }
}
