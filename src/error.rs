//! Unified error types for the ZBrain firmware.
//!
//! Every variant is `Copy`, so errors can be logged and dropped at the
//! boundary where they occur without allocation.  Nothing here is ever
//! escalated to a process abort: the tasks degrade by skipping the
//! affected event or write.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Message bus publish or receive failed.
    Bus(BusError),
    /// An LED write was rejected.
    Led(LedError),
    /// A radio command frame was malformed.
    Frame(FrameError),
    /// Peripheral or task initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Led(e) => write!(f, "led: {e}"),
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Capacity exhausted; the message was discarded and counted.
    Full,
    /// No message arrived before the deadline.
    Timeout,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "queue full"),
            Self::Timeout => write!(f, "receive timed out"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// LED errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    /// Id is outside the LED bank.
    InvalidId,
    /// The output was never configured or failed to initialise.
    DeviceNotReady,
    /// The GPIO write itself failed.
    WriteFailed,
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "invalid LED id"),
            Self::DeviceNotReady => write!(f, "LED device not ready"),
            Self::WriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<LedError> for Error {
    fn from(e: LedError) -> Self {
        Self::Led(e)
    }
}

// ---------------------------------------------------------------------------
// Radio command frame errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Partial (offset) writes are not supported.
    InvalidOffset,
    /// Frames are exactly 5 bytes.
    InvalidLength(usize),
    /// Command id byte does not name a known command.
    UnknownCommand(u8),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOffset => write!(f, "non-zero write offset"),
            Self::InvalidLength(len) => write!(f, "invalid frame length {len}"),
            Self::UnknownCommand(id) => write!(f, "unknown command id {id}"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
