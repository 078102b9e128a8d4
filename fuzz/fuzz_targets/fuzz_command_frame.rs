//! Fuzz target: radio command characteristic writes
//!
//! Splits the input into a write offset and frame body, runs the decoder,
//! and pushes accepted frames through `RadioLink::on_command_write` into a
//! small bus.  Nothing may panic.  A frame the decoder accepts must be
//! exactly one resident message afterwards; an unknown id is acknowledged
//! without publishing.
//!
//! cargo fuzz run fuzz_command_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use zbrain::adapters::ble::{LogNotifySink, RadioLink, decode_command_frame};
use zbrain::app::ports::Clock;
use zbrain::bus::Bus;
use zbrain::error::FrameError;

struct Zero;
impl Clock for Zero {
    fn now_ms(&self) -> u32 {
        0
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&offset, frame)) = data.split_first() else {
        return;
    };
    let offset = u16::from(offset & 0x03);

    let decoded = decode_command_frame(frame, offset);

    let bus: Bus<2> = Bus::new();
    let link = RadioLink::new(LogNotifySink);
    let written = link.on_command_write(&bus, &Zero, frame, offset);
    match decoded {
        Ok(payload) => assert_eq!(written, Ok(Some(payload))),
        Err(FrameError::UnknownCommand(_)) => assert_eq!(written, Ok(None)),
        Err(e) => assert_eq!(written, Err(e)),
    }
    assert_eq!(bus.len(), usize::from(matches!(written, Ok(Some(_)))));
});
