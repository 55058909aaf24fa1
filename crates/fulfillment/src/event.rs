//! Workflow notifications.
//!
//! One event per externally observable fact. Payloads are self-contained
//! (line snapshots included) so a dashboard can update its view without
//! re-querying the core. Delivery is at-least-once and lossy-tolerant;
//! nothing downstream of these events affects order or stock state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seragam_catalog::{Gender, Level};
use seragam_core::{ItemId, OrderId, OrderItemId};
use seragam_events::Event;
use seragam_orders::{ItemStatus, Order, OrderNumber, OrderStatus};
use seragam_stock::StockChange;

/// Line snapshot embedded in order events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineSnapshot {
    pub order_item_id: OrderItemId,
    pub item_id: ItemId,
    pub item_name: String,
    pub qty_requested: u32,
    pub qty_provided: u32,
    pub status: ItemStatus,
}

impl OrderLineSnapshot {
    fn capture(order: &Order) -> Vec<Self> {
        order
            .items()
            .iter()
            .map(|i| Self {
                order_item_id: i.id_typed(),
                item_id: i.item_id(),
                item_name: i.item_name().to_string(),
                qty_requested: i.qty_requested(),
                qty_provided: i.qty_provided(),
                status: i.status(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub number: OrderNumber,
    pub student_name: String,
    pub level: Level,
    pub gender: Gender,
    pub lines: Vec<OrderLineSnapshot>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub number: OrderNumber,
    pub previous: OrderStatus,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineSnapshot>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReturned {
    pub order_id: OrderId,
    pub number: OrderNumber,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineSnapshot>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub number: OrderNumber,
    pub lines: Vec<OrderLineSnapshot>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEdited {
    pub order_id: OrderId,
    pub number: OrderNumber,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineSnapshot>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNotified {
    pub order_id: OrderId,
    pub number: OrderNumber,
    pub occurred_at: DateTime<Utc>,
}

/// Post-change absolute quantity for one item. Emitted once per item whose
/// stock actually moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChanged {
    pub item_id: ItemId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// All notifications the fulfillment workflow can emit, on one bus so
/// consumers subscribe once and filter by [`Event::event_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum WorkflowEvent {
    OrderCreated(OrderCreated),
    OrderStatusChanged(OrderStatusChanged),
    OrderReturned(OrderReturned),
    OrderCancelled(OrderCancelled),
    OrderEdited(OrderEdited),
    OrderNotified(OrderNotified),
    StockChanged(StockChanged),
}

impl WorkflowEvent {
    pub fn order_created(order: &Order, occurred_at: DateTime<Utc>) -> Self {
        Self::OrderCreated(OrderCreated {
            order_id: order.id_typed(),
            number: order.number().clone(),
            student_name: order.student_name().to_string(),
            level: order.level(),
            gender: order.gender(),
            lines: OrderLineSnapshot::capture(order),
            occurred_at,
        })
    }

    pub fn order_status_changed(
        order: &Order,
        previous: OrderStatus,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::OrderStatusChanged(OrderStatusChanged {
            order_id: order.id_typed(),
            number: order.number().clone(),
            previous,
            status: order.status(),
            lines: OrderLineSnapshot::capture(order),
            occurred_at,
        })
    }

    pub fn order_returned(order: &Order, occurred_at: DateTime<Utc>) -> Self {
        Self::OrderReturned(OrderReturned {
            order_id: order.id_typed(),
            number: order.number().clone(),
            status: order.status(),
            lines: OrderLineSnapshot::capture(order),
            occurred_at,
        })
    }

    pub fn order_cancelled(order: &Order, occurred_at: DateTime<Utc>) -> Self {
        Self::OrderCancelled(OrderCancelled {
            order_id: order.id_typed(),
            number: order.number().clone(),
            lines: OrderLineSnapshot::capture(order),
            occurred_at,
        })
    }

    pub fn order_edited(order: &Order, occurred_at: DateTime<Utc>) -> Self {
        Self::OrderEdited(OrderEdited {
            order_id: order.id_typed(),
            number: order.number().clone(),
            status: order.status(),
            lines: OrderLineSnapshot::capture(order),
            occurred_at,
        })
    }

    pub fn order_notified(order: &Order, occurred_at: DateTime<Utc>) -> Self {
        Self::OrderNotified(OrderNotified {
            order_id: order.id_typed(),
            number: order.number().clone(),
            occurred_at,
        })
    }

    pub fn stock_changed(change: StockChange, occurred_at: DateTime<Utc>) -> Self {
        Self::StockChanged(StockChanged {
            item_id: change.item_id,
            quantity: change.quantity,
            occurred_at,
        })
    }
}

impl Event for WorkflowEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::OrderCreated(_) => "order-created",
            Self::OrderStatusChanged(_) => "order-status-changed",
            Self::OrderReturned(_) => "order-returned",
            Self::OrderCancelled(_) => "order-cancelled",
            Self::OrderEdited(_) => "order-edited",
            Self::OrderNotified(_) => "order-notified",
            Self::StockChanged(_) => "stock-changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::OrderCreated(e) => e.occurred_at,
            Self::OrderStatusChanged(e) => e.occurred_at,
            Self::OrderReturned(e) => e.occurred_at,
            Self::OrderCancelled(e) => e.occurred_at,
            Self::OrderEdited(e) => e.occurred_at,
            Self::OrderNotified(e) => e.occurred_at,
            Self::StockChanged(e) => e.occurred_at,
        }
    }
}
