//! Task spawning with a static priority, stack size and core affinity.
//!
//! ESP-IDF implements `std::thread` on top of pthreads, which are thin
//! FreeRTOS tasks.  `esp_pthread_set_cfg()` configures the *next*
//! `pthread_create()` from the calling thread, so the config→spawn pair
//! must not interleave with other thread creation on the same thread.
//! On the host, priority and core are ignored.

use crate::error::Error;

/// CPU core identifiers for the ESP32-S3 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): Bluetooth controller and host stack.
    Pro = 0,
    /// Core 1 (APP_CPU): sensor, controller and actuator tasks.
    App = 1,
}

/// Static task parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Null-terminated task name, e.g. `"controller\0"`.
    pub name: &'static str,
    pub core: Core,
    /// FreeRTOS priority (higher runs first).
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

#[cfg(target_os = "espidf")]
pub fn spawn_task(
    task: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>, Error> {
    // SAFETY: the config is consumed by the spawn below on this same thread.
    unsafe {
        let mut cfg = esp_idf_svc::sys::esp_create_default_pthread_config();
        cfg.pin_to_core = task.core as i32;
        cfg.prio = task.priority as i32;
        cfg.stack_size = (task.stack_kb * 1024) as i32;
        cfg.thread_name = task.name.as_ptr() as *const _;
        if esp_idf_svc::sys::esp_pthread_set_cfg(&cfg) != esp_idf_svc::sys::ESP_OK as i32 {
            return Err(Error::Init("esp_pthread_set_cfg failed"));
        }
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        task.display_name(),
        task.core,
        task.priority,
        task.stack_kb
    );

    std::thread::Builder::new()
        .name(task.display_name().into())
        .spawn(f)
        .map_err(|_| Error::Init("task creation failed"))
}

/// Simulation fallback; ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    task: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>, Error> {
    log::info!(
        "Spawning '{}' (sim, pri={} ignored, stack={}KB)",
        task.display_name(),
        task.priority,
        task.stack_kb
    );

    std::thread::Builder::new()
        .name(task.display_name().into())
        .stack_size(task.stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Init("task creation failed"))
}
