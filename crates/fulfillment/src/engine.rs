//! The fulfillment engine: every workflow operation in one place.
//!
//! Each mutating operation follows the same shape:
//!
//! 1. run the load → validate → mutate → persist sequence inside the
//!    [`TransactionScope`], so order state and stock quantities move
//!    together or not at all;
//! 2. only after the scope returns successfully, emit notifications.
//!
//! Stock is adjusted before the order write; if the order write then fails
//! the stock batch is compensated with its inverse inside the same scope, so
//! no observer sees the halfway state.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use seragam_core::{
    AggregateRoot, DomainError, DomainResult, ExpectedVersion, ItemId, OrderId, OrderItemId,
};
use seragam_events::EventBus;
use seragam_orders::{
    EditLease, EditLine, ItemStatus, NewOrderLine, Order, OrderRepository,
};
use seragam_stock::{StockChange, StockDelta, StockError, StockRepository};

use crate::emitter::NotificationEmitter;
use crate::event::WorkflowEvent;
use crate::ledger::{self, StockLedger};

/// Serializes a unit of work against all other engine work.
///
/// The in-memory implementation is a process-wide mutex; a database-backed
/// one would open a transaction. Everything the closure does is invisible to
/// other operations until it returns `Ok`.
pub trait TransactionScope: Send + Sync {
    fn run<T, F>(&self, work: F) -> DomainResult<T>
    where
        F: FnOnce() -> DomainResult<T>;
}

impl<X> TransactionScope for Arc<X>
where
    X: TransactionScope + ?Sized,
{
    fn run<T, F>(&self, work: F) -> DomainResult<T>
    where
        F: FnOnce() -> DomainResult<T>,
    {
        (**self).run(work)
    }
}

/// Input for order creation (Measurement role). Line item names are
/// snapshotted from the catalog at the API boundary.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub student_name: String,
    pub level: seragam_catalog::Level,
    pub gender: seragam_catalog::Gender,
    pub lines: Vec<NewOrderLine>,
}

/// One reviewed line in a QC batch.
///
/// `base_qty` is the provided quantity the reviewer saw when the form was
/// loaded. On a line that has already been through review the stock delta
/// is computed against it, so a re-review only takes the increase from
/// stock; `None` falls back to the line's stored provided quantity.
/// Ignored for a line still awaiting its first review — there the whole
/// quantity is net-new consumption.
#[derive(Debug, Copy, Clone)]
pub struct ProvidedQty {
    pub order_item_id: OrderItemId,
    pub qty_provided: u32,
    pub base_qty: Option<u32>,
}

pub struct FulfillmentEngine<O, S, X, B> {
    orders: O,
    ledger: StockLedger<S>,
    scope: X,
    emitter: NotificationEmitter<B>,
}

impl<O, S, X, B> FulfillmentEngine<O, S, X, B>
where
    O: OrderRepository,
    S: StockRepository,
    X: TransactionScope,
    B: EventBus<WorkflowEvent>,
{
    pub fn new(orders: O, stock: S, scope: X, bus: B) -> Self {
        Self {
            orders,
            ledger: StockLedger::new(stock),
            scope,
            emitter: NotificationEmitter::new(bus),
        }
    }

    /// Create an order. Starts `InProgress`; stock is untouched until QC
    /// review.
    pub fn create_order(&self, input: NewOrder) -> DomainResult<Order> {
        let now = Utc::now();
        let order = self.scope.run(|| {
            let number = self.orders.next_order_number()?;
            let order = Order::create(
                OrderId::new(),
                number,
                input.student_name,
                input.level,
                input.gender,
                input.lines,
                now,
            )?;
            self.orders.insert(&order)?;
            Ok(order)
        })?;

        info!(order = %order.number(), student = order.student_name(), "order created");
        self.emitter.emit(WorkflowEvent::order_created(&order, now));
        Ok(order)
    }

    /// Warehouse acknowledges an order. Idempotent.
    pub fn mark_notified(&self, order_id: OrderId) -> DomainResult<Order> {
        let now = Utc::now();
        let order = self.scope.run(|| {
            let mut order = self.orders.load(order_id)?;
            let expected = ExpectedVersion::Exact(order.version());
            order.mark_notified(now);
            order.touch(now);
            self.orders.update(&order, expected)?;
            Ok(order)
        })?;

        self.emitter.emit(WorkflowEvent::order_notified(&order, now));
        Ok(order)
    }

    /// Open an edit session and hand back the advisory lease. Rejected while
    /// another lease still looks active; past the window the stale lock is
    /// simply overwritten. This is the only place the lock is checked —
    /// mutating operations trust the caller (see `seragam_orders::lease`).
    pub fn open_edit(&self, order_id: OrderId) -> DomainResult<EditLease> {
        let now = Utc::now();
        self.scope.run(|| {
            let mut order = self.orders.load(order_id)?;
            if order.status().is_terminal() {
                return Err(DomainError::invariant("cannot edit a cancelled order"));
            }
            if order.is_locked(now) {
                return Err(DomainError::concurrent(format!(
                    "order {} is locked for editing",
                    order.number()
                )));
            }
            let expected = ExpectedVersion::Exact(order.version());
            let lease = order.open_edit(now);
            order.touch(now);
            self.orders.update(&order, expected)?;
            Ok(lease)
        })
    }

    /// Release an edit session without changes.
    pub fn close_edit(&self, order_id: OrderId) -> DomainResult<()> {
        let now = Utc::now();
        self.scope.run(|| {
            let mut order = self.orders.load(order_id)?;
            let expected = ExpectedVersion::Exact(order.version());
            order.close_edit(now);
            order.touch(now);
            self.orders.update(&order, expected)?;
            Ok(())
        })
    }

    /// Replace an order's line set from an edit session (Measurement role).
    /// Stock is not touched: requested quantities carry no reservation.
    pub fn apply_edit(&self, order_id: OrderId, lines: Vec<EditLine>) -> DomainResult<Order> {
        let now = Utc::now();
        let (order, previous) = self.scope.run(|| {
            let mut order = self.orders.load(order_id)?;
            let expected = ExpectedVersion::Exact(order.version());
            let previous = order.status();
            order.apply_edit(lines, now)?;
            order.touch(now);
            self.orders.update(&order, expected)?;
            Ok((order, previous))
        })?;

        info!(order = %order.number(), "order edited");
        self.emitter.emit(WorkflowEvent::order_edited(&order, now));
        if order.status() != previous {
            self.emitter
                .emit(WorkflowEvent::order_status_changed(&order, previous, now));
        }
        Ok(order)
    }

    /// QC review: record provided quantities for a batch of lines, decrement
    /// stock for what was newly taken, and recompute the order status.
    ///
    /// All-or-nothing: one bad line (unknown id, duplicate, provided above
    /// requested, insufficient stock) rejects the whole batch with no order
    /// or stock mutation. A subset of the order's lines is a legal batch,
    /// and re-submitting an already-reviewed line with an unchanged quantity
    /// is stock-neutral.
    ///
    /// Reducing a provided quantity never restores stock; only an explicit
    /// return does.
    pub fn complete_review(
        &self,
        order_id: OrderId,
        lines: Vec<ProvidedQty>,
    ) -> DomainResult<Order> {
        let now = Utc::now();
        let (order, previous, changes) = self.scope.run(|| {
            if lines.is_empty() {
                return Err(DomainError::validation(
                    "a review batch needs at least one line",
                ));
            }

            let mut order = self.orders.load(order_id)?;
            if order.status().is_terminal() {
                return Err(DomainError::invariant("cannot review a cancelled order"));
            }
            let expected = ExpectedVersion::Exact(order.version());
            let previous = order.status();

            let mut seen: HashSet<OrderItemId> = HashSet::new();
            let mut deltas: Vec<StockDelta> = Vec::new();
            for line in &lines {
                if !seen.insert(line.order_item_id) {
                    return Err(DomainError::validation(format!(
                        "order item {} listed twice in review",
                        line.order_item_id
                    )));
                }
                let (item_id, stored_provided, reviewed) = {
                    let item = order.item(line.order_item_id).ok_or_else(|| {
                        DomainError::not_found(format!("order item {}", line.order_item_id))
                    })?;
                    (
                        item.item_id(),
                        item.qty_provided(),
                        item.status() != ItemStatus::InProgress,
                    )
                };
                // Baseline is per line: a line that has been through review
                // already owes stock only for the increase over what it had
                // committed (or over the base_qty snapshot the reviewer
                // saw). A line awaiting its first review is all net-new.
                let baseline = if reviewed {
                    line.base_qty.unwrap_or(stored_provided)
                } else {
                    0
                };
                // Validates provided <= requested and re-derives the line status.
                order.set_item_provided(line.order_item_id, line.qty_provided, now)?;

                let shortfall = i64::from(line.qty_provided) - i64::from(baseline);
                if shortfall > 0 {
                    deltas.push(StockDelta::new(item_id, -shortfall));
                }
            }

            let changes = self
                .ledger
                .apply(&deltas)
                .map_err(|err| insufficiency_named(&order, err))?;

            order.recompute_status();
            order.touch(now);
            if let Err(err) = self.orders.update(&order, expected) {
                self.compensate(&deltas);
                return Err(err);
            }
            Ok((order, previous, changes))
        })?;

        info!(order = %order.number(), status = ?order.status(), "review applied");
        self.emit_stock_changes(&changes);
        if order.status() != previous {
            self.emitter
                .emit(WorkflowEvent::order_status_changed(&order, previous, now));
        }
        Ok(order)
    }

    /// QC returns an order. On an `InProgress` order the partial review is
    /// undone and the provided quantities go back to stock; from `Pending` or
    /// `Completed` only the `returned` flag flips.
    pub fn return_order(&self, order_id: OrderId) -> DomainResult<Order> {
        let now = Utc::now();
        let (order, previous, changes) = self.scope.run(|| {
            let mut order = self.orders.load(order_id)?;
            let expected = ExpectedVersion::Exact(order.version());
            let previous = order.status();

            let restored = order.apply_return(now)?;
            let changes = self.ledger.restore(&restored).map_err(ledger::to_domain)?;

            order.touch(now);
            if let Err(err) = self.orders.update(&order, expected) {
                self.compensate_restore(&restored);
                return Err(err);
            }
            Ok((order, previous, changes))
        })?;

        info!(order = %order.number(), "order returned");
        self.emitter.emit(WorkflowEvent::order_returned(&order, now));
        self.emit_stock_changes(&changes);
        if order.status() != previous {
            self.emitter
                .emit(WorkflowEvent::order_status_changed(&order, previous, now));
        }
        Ok(order)
    }

    /// QC cancels a `Pending` order. The full requested quantities go back
    /// to stock and the order becomes terminal.
    pub fn cancel_order(&self, order_id: OrderId) -> DomainResult<Order> {
        let now = Utc::now();
        let (order, changes) = self.scope.run(|| {
            let mut order = self.orders.load(order_id)?;
            let expected = ExpectedVersion::Exact(order.version());

            let restored = order.apply_cancel(now)?;
            let changes = self.ledger.restore(&restored).map_err(ledger::to_domain)?;

            order.touch(now);
            if let Err(err) = self.orders.update(&order, expected) {
                self.compensate_restore(&restored);
                return Err(err);
            }
            Ok((order, changes))
        })?;

        info!(order = %order.number(), "order cancelled");
        self.emitter.emit(WorkflowEvent::order_cancelled(&order, now));
        self.emit_stock_changes(&changes);
        Ok(order)
    }

    /// Warehouse adds stock for an item.
    pub fn increase_stock(&self, item_id: ItemId, qty: u32) -> DomainResult<u32> {
        if qty == 0 {
            return Err(DomainError::invalid_quantity(
                "stock adjustment must be at least 1",
            ));
        }
        let changes = self
            .scope
            .run(|| self.ledger.increase(item_id, qty).map_err(ledger::to_domain))?;
        self.emit_stock_changes(&changes);
        Ok(changes.first().map(|c| c.quantity).unwrap_or(0))
    }

    /// Warehouse removes stock for an item. Floors at zero: a removal past
    /// the available quantity is rejected whole.
    pub fn decrease_stock(&self, item_id: ItemId, qty: u32) -> DomainResult<u32> {
        if qty == 0 {
            return Err(DomainError::invalid_quantity(
                "stock adjustment must be at least 1",
            ));
        }
        let changes = self
            .scope
            .run(|| self.ledger.decrease(item_id, qty).map_err(ledger::to_domain))?;
        self.emit_stock_changes(&changes);
        Ok(changes.first().map(|c| c.quantity).unwrap_or(0))
    }

    /// Zero one item's stock. Notifies even when it was already zero.
    pub fn reset_stock(&self, item_id: ItemId) -> DomainResult<()> {
        let change = self
            .scope
            .run(|| self.ledger.reset(item_id).map_err(ledger::to_domain))?;
        self.emit_stock_changes(std::slice::from_ref(&change));
        Ok(())
    }

    /// Zero every item's stock (start-of-season reset).
    pub fn reset_all_stock(&self) -> DomainResult<()> {
        let changes = self
            .scope
            .run(|| self.ledger.reset_all().map_err(ledger::to_domain))?;
        self.emit_stock_changes(&changes);
        Ok(())
    }

    pub fn stock_quantity(&self, item_id: ItemId) -> DomainResult<u32> {
        self.ledger.quantity_of(item_id).map_err(ledger::to_domain)
    }

    pub fn get_order(&self, order_id: OrderId) -> DomainResult<Order> {
        self.orders.load(order_id)
    }

    pub fn list_orders(&self) -> DomainResult<Vec<Order>> {
        self.orders.list()
    }

    fn emit_stock_changes(&self, changes: &[StockChange]) {
        let now = Utc::now();
        self.emitter.emit_all(
            changes
                .iter()
                .map(|change| WorkflowEvent::stock_changed(*change, now)),
        );
    }

    /// Undo an applied stock batch after a failed order write. Inverses of a
    /// just-applied batch cannot themselves fail validation; a failure here
    /// means the backend is gone and is only loggable.
    fn compensate(&self, applied: &[StockDelta]) {
        let inverse: Vec<StockDelta> = applied.iter().map(|d| d.inverse()).collect();
        if let Err(err) = self.ledger.apply(&inverse) {
            error!(error = %err, "stock compensation failed; quantities may be inconsistent");
        }
    }

    fn compensate_restore(&self, restored: &[(ItemId, u32)]) {
        let inverse: Vec<StockDelta> = restored
            .iter()
            .map(|(item_id, qty)| StockDelta::new(*item_id, -i64::from(*qty)))
            .collect();
        if let Err(err) = self.ledger.apply(&inverse) {
            error!(error = %err, "stock compensation failed; quantities may be inconsistent");
        }
    }
}

/// Re-map a stock insufficiency to the order line's item name so QC sees
/// "insufficient stock for Kemeja SD M" rather than a bare id.
fn insufficiency_named(order: &Order, err: StockError) -> DomainError {
    match err {
        StockError::Insufficient { item_id, .. } => {
            let reference = order
                .items()
                .iter()
                .find(|i| i.item_id() == item_id)
                .map(|i| i.item_name().to_string())
                .unwrap_or_else(|| item_id.to_string());
            DomainError::insufficient_stock(reference)
        }
        other => ledger::to_domain(other),
    }
}
