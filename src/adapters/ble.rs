//! BLE radio link adapter.
//!
//! Protocol layer between the GATT server and the bus: button
//! notifications go out on the event characteristic, command frames come
//! in on the command characteristic.  Controller enable, advertising and
//! attribute registration belong to the radio stack; the stack calls into
//! [`RadioLink`] from its callbacks and supplies a [`NotifySink`] for
//! outbound frames.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                                   | Perms  |
//! |----------------|----------------------------------------|--------|
//! | Button Event   | `1a2b3c4d-1111-2222-3333-1234567890ac` | Notify |
//! | Command        | `1a2b3c4d-1111-2222-3333-1234567890ad` | Write  |
//!
//! ## Frames
//!
//! ```text
//! Event (7 bytes, notify):
//! ┌──────┬────┬─────────┬──────────────────┐
//! │ type │ id │ pressed │ timestamp_ms LE  │
//! │ (0)  │    │  0 / 1  │      (4B)        │
//! └──────┴────┴─────────┴──────────────────┘
//!
//! Command (5 bytes, write at offset 0):
//! ┌────────────┬──────────────────┐
//! │ command_id │    value LE      │
//! │    (1B)    │      (4B)        │
//! └────────────┴──────────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};

use crate::app::ports::{ButtonNotifier, Clock, NotifySink};
use crate::bus::Bus;
use crate::error::FrameError;
use crate::message::{CommandId, CommandPayload, Message, MessageType, Payload, Source};

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const SERVICE_UUID: u128 = 0x1a2b3c4d_1111_2222_3333_1234567890ab;
pub const CHAR_EVENT: u128 = 0x1a2b3c4d_1111_2222_3333_1234567890ac;
pub const CHAR_COMMAND: u128 = 0x1a2b3c4d_1111_2222_3333_1234567890ad;

pub const EVENT_FRAME_LEN: usize = 7;
pub const COMMAND_FRAME_LEN: usize = 5;

/// Client Characteristic Configuration value enabling notifications.
const CCC_NOTIFY: u16 = 0x0001;

// ───────────────────────────────────────────────────────────────
// Frame codec
// ───────────────────────────────────────────────────────────────

pub fn encode_button_frame(button_id: u8, pressed: bool, timestamp_ms: u32) -> [u8; EVENT_FRAME_LEN] {
    let ts = timestamp_ms.to_le_bytes();
    [
        MessageType::ButtonEvent as u8,
        button_id,
        u8::from(pressed),
        ts[0],
        ts[1],
        ts[2],
        ts[3],
    ]
}

/// Decode a command characteristic write.  Only whole, unfragmented
/// writes are accepted.
pub fn decode_command_frame(data: &[u8], offset: u16) -> Result<CommandPayload, FrameError> {
    if offset != 0 {
        return Err(FrameError::InvalidOffset);
    }
    let frame: &[u8; COMMAND_FRAME_LEN] = data
        .try_into()
        .map_err(|_| FrameError::InvalidLength(data.len()))?;
    let command_id = CommandId::from_u8(frame[0]).ok_or(FrameError::UnknownCommand(frame[0]))?;
    let value = u32::from_le_bytes([frame[1], frame[2], frame[3], frame[4]]);
    Ok(CommandPayload { command_id, value })
}

// ───────────────────────────────────────────────────────────────
// Link state
// ───────────────────────────────────────────────────────────────

/// Connection and subscription state plus the outbound sink.
///
/// Callbacks arrive on the radio stack's thread while the controller
/// notifies from its own, so the flags are atomics and every method
/// takes `&self`.
pub struct RadioLink<S> {
    sink: S,
    connected: AtomicBool,
    notify_enabled: AtomicBool,
}

impl<S: NotifySink> RadioLink<S> {
    pub const fn new(sink: S) -> Self {
        Self {
            sink,
            connected: AtomicBool::new(false),
            notify_enabled: AtomicBool::new(false),
        }
    }

    pub fn on_connected(&self) {
        self.connected.store(true, Ordering::Release);
        info!("BLE connected");
    }

    pub fn on_disconnected(&self) {
        self.connected.store(false, Ordering::Release);
        self.notify_enabled.store(false, Ordering::Release);
        info!("BLE disconnected");
    }

    pub fn on_ccc_changed(&self, value: u16) {
        let enabled = value == CCC_NOTIFY;
        self.notify_enabled.store(enabled, Ordering::Release);
        info!("BLE notifications {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notify_enabled.load(Ordering::Acquire)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Send a button event frame if a subscribed central is connected.
    /// Never blocks and never reports failure to the caller.
    pub fn notify_button(&self, button_id: u8, pressed: bool, timestamp_ms: u32) {
        if !self.is_connected() || !self.notifications_enabled() {
            return;
        }
        let frame = encode_button_frame(button_id, pressed, timestamp_ms);
        if let Err(e) = self.sink.send(&frame) {
            warn!("BLE notify btn {} failed: {}", button_id, e);
        }
    }

    /// Handle a write to the command characteristic.
    ///
    /// Only a bad offset or length fails the write.  A well-formed frame
    /// with an unknown command id is acknowledged and dropped
    /// (`Ok(None)`).  A valid frame becomes a `Command` message from
    /// `Radio`; a full bus is logged here and the write still succeeds.
    pub fn on_command_write<const CAP: usize>(
        &self,
        bus: &Bus<CAP>,
        clock: &impl Clock,
        data: &[u8],
        offset: u16,
    ) -> Result<Option<CommandPayload>, FrameError> {
        let payload = match decode_command_frame(data, offset) {
            Ok(p) => p,
            Err(FrameError::UnknownCommand(id)) => {
                warn!("BLE cmd id {} unknown, dropped", id);
                return Ok(None);
            }
            Err(e) => {
                warn!("BLE command rejected: {}", e);
                return Err(e);
            }
        };
        debug!("BLE cmd {:?} val={}", payload.command_id, payload.value);

        let msg = Message::new(Source::Radio, clock.now_ms(), Payload::Command(payload));
        if bus.publish(msg).is_err() {
            warn!("BLE cmd dropped, bus full (drops={})", bus.drop_count());
        }
        Ok(Some(payload))
    }
}

impl<S: NotifySink> ButtonNotifier for &RadioLink<S> {
    fn notify_button(&mut self, button_id: u8, pressed: bool, timestamp_ms: u32) {
        RadioLink::notify_button(*self, button_id, pressed, timestamp_ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Logging sink
// ───────────────────────────────────────────────────────────────

/// Sink that writes frames to the log instead of the air.  Used until a
/// GATT server is attached, and on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifySink;

impl NotifySink for LogNotifySink {
    fn send(&self, frame: &[u8]) -> Result<(), crate::app::ports::NotifyError> {
        info!("NOTIFY | {:02x?}", frame);
        Ok(())
    }
}
