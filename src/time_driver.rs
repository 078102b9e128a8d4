//! Time driver symbols for the `async-io-mini` timer.
//!
//! `async_io_mini::Timer` sits on `embassy-time`, which links against two
//! driver functions instead of shipping a clock.  The bus's timed receive
//! (`Deadline::After`) is the only user.
//!
//! - **`target_os = "espidf"`**: ticks come from `esp_timer_get_time()`.
//! - **other targets**: ticks are microseconds since the first query.
//!
//! Ticks are microseconds on both targets.  A wake is a short-lived thread
//! that sleeps until the deadline and then fires the waker; a timer dropped
//! before it expires gets a harmless stale wake.

use core::time::Duration;

#[cfg(not(target_os = "espidf"))]
fn uptime_us() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_micros() as u64
}

#[cfg(target_os = "espidf")]
fn uptime_us() -> u64 {
    // SAFETY: read-only query of the always-running high-resolution timer.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}

#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    uptime_us()
}

#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_schedule_wake(at: u64, waker: *mut core::ffi::c_void) {
    if waker.is_null() {
        return;
    }

    // SAFETY: embassy-time passes a valid `&Waker` for the duration of the
    // call; it is cloned before returning.
    let waker = unsafe { (&*(waker as *const core::task::Waker)).clone() };
    std::thread::spawn(move || {
        let now = uptime_us();
        if at > now {
            std::thread::sleep(Duration::from_micros(at - now));
        }
        waker.wake();
    });
}
