//! Application message bus.
//!
//! One bounded FIFO of [`Message`]s shared by every task.  Producers never
//! block: when the queue is full the message is discarded and a drop counter
//! is bumped.  Consumers block (optionally with a deadline) until a message
//! is available.
//!
//! ```text
//! ┌─────────────┐
//! │ Sensor      │──┐                    ┌──────────────────┐
//! │ Radio       │──┼──▶ publish ──▶ ┌───┤ receive_for(Ctl) │──▶ Controller
//! │ Controller  │──┘   (try, drop)  │ Q ├──────────────────┤
//! └─────────────┘                   │128│ receive_for(Act) │──▶ Actuator
//!                                   └───┴──────────────────┘
//! ```
//!
//! Each resident message carries a [`Destination`].  `receive_for` hands
//! out the oldest message addressed to the caller, so both consumers share
//! one queue, one capacity and one drop counter without stealing each
//! other's traffic.  `receive` ignores addressing and is plain FIFO.
//!
//! The queue lives behind an `embassy-sync` blocking mutex; waiting
//! consumers park their wakers in a `MultiWakerRegistration` and are woken
//! on every successful publish.

use core::cell::RefCell;
use core::future::poll_fn;
use core::sync::atomic::{AtomicU32, Ordering};
use core::task::Poll;
use core::time::Duration;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::waitqueue::MultiWakerRegistration;
use heapless::Vec;

use crate::error::BusError;
use crate::message::{Destination, Message};

/// Queue depth.  Bounds worst-case memory and makes backpressure visible.
pub const BUS_CAPACITY: usize = 128;

/// Waker slots.  One per consuming task is enough; overflow wakes everyone.
const MAX_WAITERS: usize = 4;

/// How long `receive` may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Return immediately if nothing is resident.
    NoWait,
    /// Block until a message arrives.
    Forever,
    /// Block for at most this long.
    After(Duration),
}

struct Slots<const CAP: usize> {
    queue: Vec<Message, CAP>,
    waiters: MultiWakerRegistration<MAX_WAITERS>,
}

impl<const CAP: usize> Slots<CAP> {
    /// Remove and return the oldest message accepted by `filter`.
    fn take_first(&mut self, filter: &impl Fn(&Message) -> bool) -> Option<Message> {
        let idx = self.queue.iter().position(filter)?;
        Some(self.queue.remove(idx))
    }
}

pub struct Bus<const CAP: usize = BUS_CAPACITY> {
    slots: Mutex<CriticalSectionRawMutex, RefCell<Slots<CAP>>>,
    drops: AtomicU32,
}

impl<const CAP: usize> Bus<CAP> {
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new(Slots {
                queue: Vec::new(),
                waiters: MultiWakerRegistration::new(),
            })),
            drops: AtomicU32::new(0),
        }
    }

    /// Enqueue without blocking.
    ///
    /// On `Err(BusError::Full)` the message has been discarded and the drop
    /// counter incremented.  No other error is possible.
    pub fn publish(&self, msg: Message) -> Result<(), BusError> {
        let accepted = self.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            if slots.queue.push(msg).is_err() {
                return false;
            }
            slots.waiters.wake();
            true
        });

        if accepted {
            Ok(())
        } else {
            self.drops.fetch_add(1, Ordering::Relaxed);
            Err(BusError::Full)
        }
    }

    /// Oldest resident message, regardless of destination.
    pub fn receive(&self, deadline: Deadline) -> Result<Message, BusError> {
        self.receive_where(|_| true, deadline)
    }

    /// Oldest resident message addressed to `dest`.
    pub fn receive_for(&self, dest: Destination, deadline: Deadline) -> Result<Message, BusError> {
        self.receive_where(|msg| msg.destination() == dest, deadline)
    }

    /// Cumulative number of discarded messages since start.  Wraps at `u32::MAX`.
    pub fn drop_count(&self) -> u32 {
        self.drops.load(Ordering::Relaxed)
    }

    /// Number of resident messages.
    pub fn len(&self) -> usize {
        self.slots.lock(|slots| slots.borrow().queue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        CAP
    }

    // ── Internal ──────────────────────────────────────────────

    fn try_take(&self, filter: &impl Fn(&Message) -> bool) -> Option<Message> {
        self.slots.lock(|slots| slots.borrow_mut().take_first(filter))
    }

    async fn wait_for(&self, filter: impl Fn(&Message) -> bool) -> Message {
        poll_fn(|cx| {
            self.slots.lock(|slots| {
                let mut slots = slots.borrow_mut();
                match slots.take_first(&filter) {
                    Some(msg) => Poll::Ready(msg),
                    None => {
                        slots.waiters.register(cx.waker());
                        Poll::Pending
                    }
                }
            })
        })
        .await
    }

    fn receive_where(
        &self,
        filter: impl Fn(&Message) -> bool,
        deadline: Deadline,
    ) -> Result<Message, BusError> {
        match deadline {
            Deadline::NoWait => self.try_take(&filter).ok_or(BusError::Timeout),
            Deadline::Forever => Ok(futures_lite::future::block_on(self.wait_for(filter))),
            Deadline::After(timeout) => futures_lite::future::block_on(futures_lite::future::or(
                async { Ok(self.wait_for(filter).await) },
                async {
                    async_io_mini::Timer::after(timeout).await;
                    Err(BusError::Timeout)
                },
            )),
        }
    }
}

impl<const CAP: usize> Default for Bus<CAP> {
    fn default() -> Self {
        Self::new()
    }
}
