//! ZBrain firmware library.
//!
//! Exposes the bus, message model and task logic for integration testing
//! on the host.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bus;
pub mod config;
pub mod drivers;
pub mod error;
pub mod message;
pub mod pins;
pub mod runtime;

mod time_driver;
