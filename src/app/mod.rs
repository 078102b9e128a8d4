//! Application core: the three bus tasks and their rules.
//!
//! Hardware and radio access go through `embedded-hal` or the port traits
//! in [`ports`], so every task here runs unchanged against host mocks.

pub mod actuator;
pub mod controller;
pub mod mode;
pub mod ports;
pub mod routing;
pub mod sensor;
