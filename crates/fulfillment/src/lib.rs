//! `seragam-fulfillment` — the workflow engine tying orders to stock.
//!
//! [`FulfillmentEngine`] is the single write path for the
//! Measurement/Warehouse/QC workflow: it loads aggregates through the
//! repository seams, runs each operation inside a [`TransactionScope`] so
//! order and stock move together, and emits [`WorkflowEvent`]s to the role
//! dashboards only after the mutation has committed.

pub mod emitter;
pub mod engine;
pub mod event;
pub mod ledger;

pub use emitter::NotificationEmitter;
pub use engine::{FulfillmentEngine, NewOrder, ProvidedQty, TransactionScope};
pub use event::{
    OrderCancelled, OrderCreated, OrderEdited, OrderLineSnapshot, OrderNotified, OrderReturned,
    OrderStatusChanged, StockChanged, WorkflowEvent,
};
pub use ledger::StockLedger;
