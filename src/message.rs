//! Message model: the fixed-size envelope carried end-to-end by the bus.
//!
//! ```text
//! ┌──────────┬──────────┬──────────────┬─────────────────────────────┐
//! │ type     │ source   │ timestamp_ms │ payload                     │
//! │ (tag)    │ Source   │ u32          │ Button | Command | Status   │
//! └──────────┴──────────┴──────────────┴─────────────────────────────┘
//! ```
//!
//! The payload is a tagged union, so the message type is derived from the
//! payload variant rather than stored separately.  Every message is `Copy`
//! and is value-copied into and out of a bus slot.
//!
//! Command values keep the packed 32-bit wire layout (`LedSet`: high byte =
//! target id, low byte = on/off) but are decoded into [`Command`] before
//! any logic looks at them.

use core::fmt;

use crate::app::mode::Mode;

// ───────────────────────────────────────────────────────────────
// Wire enums
// ───────────────────────────────────────────────────────────────

/// Message type tag, derived from the payload variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    ButtonEvent = 0,
    Command = 1,
    Status = 2,
}

impl MessageType {
    /// Short label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ButtonEvent => "BUTTON",
            Self::Command => "COMMAND",
            Self::Status => "STATUS",
        }
    }
}

/// Originating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Source {
    Sensor = 0,
    Radio = 1,
    System = 2,
    Buttons = 3,
    Controller = 4,
    Actuator = 5,
}

impl Source {
    /// Short label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sensor => "SENSOR",
            Self::Radio => "RADIO",
            Self::System => "SYSTEM",
            Self::Buttons => "BUTTONS",
            Self::Controller => "CONTROLLER",
            Self::Actuator => "ACTUATOR",
        }
    }
}

/// Command identifiers as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandId {
    LedToggle = 1,
    LedSet = 2,
    SetMode = 3,
    ResetStats = 4,
}

impl CommandId {
    /// Decode a wire command id.  Returns `None` for unknown ids.
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::LedToggle),
            2 => Some(Self::LedSet),
            3 => Some(Self::SetMode),
            4 => Some(Self::ResetStats),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Payloads
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button_id: u8,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPayload {
    pub command_id: CommandId,
    pub value: u32,
}

/// Reserved: published by nobody in-core and consumed by nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPayload {
    pub uptime_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    ButtonEvent(ButtonEvent),
    Command(CommandPayload),
    Status(StatusPayload),
}

// ───────────────────────────────────────────────────────────────
// Structured command view
// ───────────────────────────────────────────────────────────────

/// Decoded form of a [`CommandPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle the LED named by the low byte of the value.
    LedToggle { led: u8 },
    /// Drive an LED to an explicit state (`value = id << 8 | on`).
    LedSet { led: u8, on: bool },
    /// Show the mode indicator.  The raw value is kept because an
    /// out-of-range mode still selects the catch-all indicator.
    SetMode(u32),
    /// Acknowledge a statistics reset with a pulse.
    ResetStats,
}

impl Command {
    pub const fn decode(payload: CommandPayload) -> Self {
        let value = payload.value;
        match payload.command_id {
            CommandId::LedToggle => Self::LedToggle { led: value as u8 },
            CommandId::LedSet => Self::LedSet {
                led: (value >> 8) as u8,
                on: value & 0xFF != 0,
            },
            CommandId::SetMode => Self::SetMode(value),
            CommandId::ResetStats => Self::ResetStats,
        }
    }

    pub const fn encode(self) -> CommandPayload {
        let (command_id, value) = match self {
            Self::LedToggle { led } => (CommandId::LedToggle, led as u32),
            Self::LedSet { led, on } => (CommandId::LedSet, ((led as u32) << 8) | on as u32),
            Self::SetMode(raw) => (CommandId::SetMode, raw),
            Self::ResetStats => (CommandId::ResetStats, 0),
        };
        CommandPayload { command_id, value }
    }

    /// Convenience for the controller's own mode broadcasts.
    pub const fn set_mode(mode: Mode) -> Self {
        Self::SetMode(mode as u32)
    }
}

// ───────────────────────────────────────────────────────────────
// Envelope
// ───────────────────────────────────────────────────────────────

/// Which consumer a resident message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Needs a routing decision.
    Controller,
    /// Already routed; executed and never republished.
    Actuator,
}

/// The unit of communication on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub source: Source,
    /// Monotonic milliseconds since boot, stamped by the producer.
    pub timestamp_ms: u32,
    pub payload: Payload,
    forwarded: bool,
}

impl Message {
    pub const fn new(source: Source, timestamp_ms: u32, payload: Payload) -> Self {
        Self {
            source,
            timestamp_ms,
            payload,
            forwarded: false,
        }
    }

    pub const fn button(source: Source, timestamp_ms: u32, button_id: u8, pressed: bool) -> Self {
        Self::new(
            source,
            timestamp_ms,
            Payload::ButtonEvent(ButtonEvent { button_id, pressed }),
        )
    }

    pub const fn command(source: Source, timestamp_ms: u32, command: Command) -> Self {
        Self::new(source, timestamp_ms, Payload::Command(command.encode()))
    }

    pub const fn status(source: Source, timestamp_ms: u32, uptime_ms: u32) -> Self {
        Self::new(source, timestamp_ms, Payload::Status(StatusPayload { uptime_ms }))
    }

    pub const fn kind(&self) -> MessageType {
        match self.payload {
            Payload::ButtonEvent(_) => MessageType::ButtonEvent,
            Payload::Command(_) => MessageType::Command,
            Payload::Status(_) => MessageType::Status,
        }
    }

    /// Decoded command, if this is a Command message.
    pub const fn as_command(&self) -> Option<Command> {
        match self.payload {
            Payload::Command(payload) => Some(Command::decode(payload)),
            _ => None,
        }
    }

    /// The same message, marked as having passed through the controller.
    /// Type, source, timestamp and payload are untouched.
    #[must_use]
    pub const fn into_forwarded(mut self) -> Self {
        self.forwarded = true;
        self
    }

    pub const fn is_forwarded(&self) -> bool {
        self.forwarded
    }

    /// Commands the controller emitted or forwarded go to the actuator;
    /// everything else waits for a routing decision.
    pub const fn destination(&self) -> Destination {
        match self.payload {
            Payload::Command(_) if self.forwarded => Destination::Actuator,
            Payload::Command(_) if matches!(self.source, Source::Controller) => {
                Destination::Actuator
            }
            _ => Destination::Controller,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} @{}ms",
            self.kind().as_str(),
            self.source.as_str(),
            self.timestamp_ms
        )?;
        match self.payload {
            Payload::ButtonEvent(b) => write!(f, " id={} pressed={}", b.button_id, b.pressed),
            Payload::Command(c) => write!(f, " cmd={:?} val={}", c.command_id, c.value),
            Payload::Status(s) => write!(f, " uptime={}ms", s.uptime_ms),
        }
    }
}
