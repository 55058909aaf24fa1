//! `seragam-orders` — order aggregate and status state machine.
//!
//! An [`Order`] owns its [`OrderItem`] lines (cascade by ownership). Item
//! status is derived purely from provided vs requested quantities; order
//! status is aggregated purely from item statuses. Both derivations are
//! exposed as pure functions so the fulfillment engine can recompute against
//! an explicit snapshot instead of hidden shared state.

pub mod lease;
pub mod number;
pub mod order;
pub mod repository;
pub mod status;

pub use lease::{EDIT_LOCK_MINUTES, EditLease};
pub use number::OrderNumber;
pub use order::{EditLine, NewOrderLine, Order, OrderItem};
pub use repository::OrderRepository;
pub use status::{ItemStatus, OrderStatus, recompute_status};
