use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use seragam_catalog::{Gender, Level};
use seragam_core::{
    AggregateRoot, DomainError, DomainResult, Entity, ItemId, OrderId, OrderItemId,
};

use crate::lease::{EDIT_LOCK_MINUTES, EditLease};
use crate::number::OrderNumber;
use crate::status::{self, ItemStatus, OrderStatus};

/// Input line for order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub item_id: ItemId,
    /// Catalog name snapshot, so errors and events carry a human-readable
    /// reference without a catalog join.
    pub item_name: String,
    pub qty_requested: u32,
}

/// Input line for an edit session. `order_item_id = Some` updates an
/// existing line; `None` adds a new one. Lines absent from the edit are
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLine {
    pub order_item_id: Option<OrderItemId>,
    pub item_id: ItemId,
    pub item_name: String,
    pub qty_requested: u32,
}

/// One order line: a catalog item with requested and provided quantities.
///
/// Invariants: `qty_requested >= 1`, `qty_provided <= qty_requested`.
/// Status is derived from the quantities — [`OrderItem::set_provided`] is
/// the only path that changes it after review starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    item_id: ItemId,
    item_name: String,
    qty_requested: u32,
    qty_provided: u32,
    status: ItemStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn new(
        id: OrderItemId,
        item_id: ItemId,
        item_name: impl Into<String>,
        qty_requested: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let item_name = item_name.into();
        if item_name.trim().is_empty() {
            return Err(DomainError::validation("order line item name cannot be empty"));
        }
        if qty_requested == 0 {
            return Err(DomainError::invalid_quantity(format!(
                "requested quantity for {item_name} must be at least 1"
            )));
        }

        Ok(Self {
            id,
            item_id,
            item_name,
            qty_requested,
            qty_provided: 0,
            status: ItemStatus::InProgress,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the provided quantity and re-derive the line status.
    pub fn set_provided(&mut self, qty: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if qty > self.qty_requested {
            return Err(DomainError::invalid_quantity(format!(
                "provided {qty} exceeds requested {} for {}",
                self.qty_requested, self.item_name
            )));
        }
        self.qty_provided = qty;
        self.status = ItemStatus::derive(qty, self.qty_requested);
        self.updated_at = now;
        Ok(())
    }

    /// Change the requested quantity during an edit session.
    ///
    /// Already-provided quantity may not exceed the new request; a reviewed
    /// line is re-derived against the new request, an unreviewed one stays
    /// `InProgress`.
    pub fn set_requested(&mut self, qty: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if qty == 0 {
            return Err(DomainError::invalid_quantity(format!(
                "requested quantity for {} must be at least 1",
                self.item_name
            )));
        }
        if qty < self.qty_provided {
            return Err(DomainError::invalid_quantity(format!(
                "requested {qty} is below already provided {} for {}",
                self.qty_provided, self.item_name
            )));
        }
        self.qty_requested = qty;
        if self.status != ItemStatus::InProgress {
            self.status = ItemStatus::derive(self.qty_provided, self.qty_requested);
        }
        self.updated_at = now;
        Ok(())
    }

    fn reset(&mut self, status: ItemStatus, now: DateTime<Utc>) {
        self.qty_provided = 0;
        self.status = status;
        self.updated_at = now;
    }

    pub fn id_typed(&self) -> OrderItemId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn qty_requested(&self) -> u32 {
        self.qty_requested
    }

    pub fn qty_provided(&self) -> u32 {
        self.qty_provided
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Aggregate root: a uniform order for one student.
///
/// Owns its lines; deleting the order deletes the lines. Status transitions
/// happen only through the methods here so the invariants (sticky
/// cancellation, derived statuses, quantity bounds) hold everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    number: OrderNumber,
    student_name: String,
    level: Level,
    gender: Gender,
    status: OrderStatus,
    notified: bool,
    returned: bool,
    edited: bool,
    locked_at: Option<DateTime<Utc>>,
    items: Vec<OrderItem>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order (Measurement role). Starts `InProgress` with every
    /// line `InProgress`; nothing is reserved against stock yet.
    pub fn create(
        id: OrderId,
        number: OrderNumber,
        student_name: impl Into<String>,
        level: Level,
        gender: Gender,
        lines: Vec<NewOrderLine>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let student_name = student_name.into();
        if student_name.trim().is_empty() {
            return Err(DomainError::validation("student name cannot be empty"));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("an order needs at least one line"));
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            items.push(OrderItem::new(
                OrderItemId::new(),
                line.item_id,
                line.item_name,
                line.qty_requested,
                now,
            )?);
        }

        Ok(Self {
            id,
            number,
            student_name,
            level,
            gender,
            status: OrderStatus::InProgress,
            notified: false,
            returned: false,
            edited: false,
            locked_at: None,
            items,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set one line's provided quantity (QC review). Status is re-derived on
    /// the line only; call [`Order::recompute_status`] once after the whole
    /// batch.
    pub fn set_item_provided(
        &mut self,
        order_item_id: OrderItemId,
        qty: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == order_item_id)
            .ok_or_else(|| DomainError::not_found(format!("order item {order_item_id}")))?;
        item.set_provided(qty, now)
    }

    /// Recompute the aggregate status from the current line snapshot.
    /// No-op once cancelled.
    pub fn recompute_status(&mut self) -> OrderStatus {
        let statuses: Vec<ItemStatus> = self.items.iter().map(|i| i.status).collect();
        self.status = status::recompute_status(self.status, &statuses);
        self.status
    }

    /// Warehouse marks the order as seen/notified.
    pub fn mark_notified(&mut self, now: DateTime<Utc>) {
        self.notified = true;
        self.updated_at = now;
    }

    /// Return the order (QC). Sets the `returned` flag. When the order was
    /// still `InProgress`, partial QC work is undone: every line goes back to
    /// `qty_provided = 0` / `InProgress` and the already-provided quantities
    /// are reported back so the caller can restore stock. From `Pending` or
    /// `Completed` only the flag flips and line quantities are preserved for
    /// re-review.
    pub fn apply_return(&mut self, now: DateTime<Utc>) -> DomainResult<Vec<(ItemId, u32)>> {
        if self.status.is_terminal() {
            return Err(DomainError::invariant("cannot return a cancelled order"));
        }

        self.returned = true;
        self.updated_at = now;

        if self.status != OrderStatus::InProgress {
            return Ok(Vec::new());
        }

        let restored: Vec<(ItemId, u32)> = self
            .items
            .iter()
            .filter(|i| i.qty_provided > 0)
            .map(|i| (i.item_id, i.qty_provided))
            .collect();
        for item in &mut self.items {
            item.reset(ItemStatus::InProgress, now);
        }
        self.status = OrderStatus::InProgress;
        Ok(restored)
    }

    /// Cancel the order (QC). Only meaningful from `Pending` — cancellation
    /// assumes nothing was taken from stock yet, so the full requested
    /// quantities are reported back for restoration. Terminal afterwards.
    pub fn apply_cancel(&mut self, now: DateTime<Utc>) -> DomainResult<Vec<(ItemId, u32)>> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::invariant(format!(
                "only pending orders can be cancelled (order {} is {:?})",
                self.number, self.status
            )));
        }

        let restored: Vec<(ItemId, u32)> = self
            .items
            .iter()
            .map(|i| (i.item_id, i.qty_requested))
            .collect();
        for item in &mut self.items {
            item.reset(ItemStatus::Pending, now);
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = now;
        Ok(restored)
    }

    /// Open an edit session: record the lock timestamp and hand back an
    /// advisory lease. Not a hard lock — see [`crate::lease`].
    pub fn open_edit(&mut self, now: DateTime<Utc>) -> EditLease {
        self.locked_at = Some(now);
        self.updated_at = now;
        EditLease::new(self.id, now)
    }

    /// Close the edit session (clears the lock timestamp).
    pub fn close_edit(&mut self, now: DateTime<Utc>) {
        self.locked_at = None;
        self.updated_at = now;
    }

    /// Whether an edit lock looks held at `now` (wall-clock lease window).
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_at
            .map(|at| now - at < Duration::minutes(EDIT_LOCK_MINUTES))
            .unwrap_or(false)
    }

    /// Replace the line set from an edit session: update retained lines,
    /// append new ones, drop the rest. Only a line with nothing provided
    /// may be dropped — removing one that already consumed stock would
    /// strand those units (return the order first). All-or-nothing — a
    /// failing line leaves the order untouched. Sets `edited`, clears the
    /// lock and recomputes the aggregate status.
    pub fn apply_edit(&mut self, lines: Vec<EditLine>, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invariant("cannot edit a cancelled order"));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("an order must keep at least one line"));
        }

        let mut seen: HashSet<OrderItemId> = HashSet::new();
        let mut next: Vec<OrderItem> = Vec::with_capacity(lines.len());
        for line in lines {
            match line.order_item_id {
                Some(id) => {
                    if !seen.insert(id) {
                        return Err(DomainError::validation(format!(
                            "order item {id} listed twice in edit"
                        )));
                    }
                    let mut item = self
                        .items
                        .iter()
                        .find(|i| i.id == id)
                        .cloned()
                        .ok_or_else(|| DomainError::not_found(format!("order item {id}")))?;
                    item.set_requested(line.qty_requested, now)?;
                    next.push(item);
                }
                None => next.push(OrderItem::new(
                    OrderItemId::new(),
                    line.item_id,
                    line.item_name,
                    line.qty_requested,
                    now,
                )?),
            }
        }

        for item in &self.items {
            if item.qty_provided > 0 && !seen.contains(&item.id) {
                return Err(DomainError::invariant(format!(
                    "cannot drop {} with provided quantity {}; return the order first",
                    item.item_name, item.qty_provided
                )));
            }
        }

        self.items = next;
        self.edited = true;
        self.locked_at = None;
        self.updated_at = now;
        self.recompute_status();
        Ok(())
    }

    /// Bump the persisted version. Called once per committed mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn number(&self) -> &OrderNumber {
        &self.number
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn notified(&self) -> bool {
        self.notified
    }

    pub fn returned(&self) -> bool {
        self.returned
    }

    pub fn edited(&self) -> bool {
        self.edited
    }

    pub fn locked_at(&self) -> Option<DateTime<Utc>> {
        self.locked_at
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, order_item_id: OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == order_item_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
