//! Command routing table.
//!
//! Every Command that reaches the controller gets exactly one of two
//! outcomes: handled on the spot, or forwarded once to the actuator.
//!
//! | Source        | Command   | Route          |
//! |---------------|-----------|----------------|
//! | Radio         | SetMode   | HandleLocally  |
//! | anything else | any       | Forward        |
//!
//! A SetMode from a source other than the radio is forwarded like any other
//! command: the actuator shows the indicator but the controller's mode does
//! not move.

use crate::message::{CommandId, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The controller applies the command to its own state.
    HandleLocally,
    /// Republished once, marked for the actuator.
    Forward,
}

pub const fn route(source: Source, command: CommandId) -> Route {
    match (source, command) {
        (Source::Radio, CommandId::SetMode) => Route::HandleLocally,
        _ => Route::Forward,
    }
}
