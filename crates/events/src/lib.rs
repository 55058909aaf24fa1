//! Notification events: trait + pub/sub transport seam.
//!
//! The core treats cross-role notification as an event-emission interface:
//! domain operations publish typed events, and channel/role routing is a
//! subscriber-side concern. This crate holds the transport-agnostic pieces.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
