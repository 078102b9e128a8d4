//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter | Implements                 | Connects to              |
//! |---------|----------------------------|--------------------------|
//! | `ble`   | ButtonNotifier, NotifySink | GATT event/command chars |
//! | `time`  | Clock, DelayNs             | ESP32 system timer       |

pub mod ble;
pub mod time;
