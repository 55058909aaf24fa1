//! Event publishing/subscription abstraction (mechanics only).
//!
//! A lightweight pub/sub seam between the fulfillment core and whatever
//! transport fans events out to the Measurement/Warehouse/QC roles:
//!
//! - **Transport-agnostic**: works with in-memory channels, websockets,
//!   message queues, etc.
//! - **At-least-once delivery**: events may be delivered multiple times;
//!   consumers must be idempotent.
//! - **No persistence**: the bus distributes; it is not a store. State
//!   mutations are committed before anything is published, so a lost or
//!   duplicated notification never affects order or stock state.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an event stream.
///
/// Each subscription gets a copy of all events published to the bus
/// (broadcast semantics). Designed for single-threaded consumption; use one
/// subscription per consumer thread.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered without blocking.
    pub fn drain(&self) -> Vec<M> {
        let mut out = Vec::new();
        while let Ok(m) = self.try_recv() {
            out.push(m);
        }
        out
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (bus full, transport down). The fulfillment core
/// treats publication as fire-and-forget relative to state mutation: a
/// failed publish is logged by the caller and never rolls back a committed
/// change.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
