use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use seragam_core::ItemId;

/// One signed quantity adjustment for a catalog item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDelta {
    pub item_id: ItemId,
    pub delta: i64,
}

impl StockDelta {
    pub fn new(item_id: ItemId, delta: i64) -> Self {
        Self { item_id, delta }
    }

    /// The delta that exactly undoes this one.
    pub fn inverse(self) -> Self {
        Self {
            item_id: self.item_id,
            delta: -self.delta,
        }
    }
}

/// Post-apply quantity for an item whose stock actually changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Stock storage error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// A decrement would take the quantity below zero. The whole batch is
    /// rejected; no quantity was touched.
    #[error("insufficient stock for item {item_id}: available {available}, requested {requested}")]
    Insufficient {
        item_id: ItemId,
        available: u32,
        requested: u32,
    },

    /// Backend failure (lock poisoning, connection loss, ...).
    #[error("stock storage failure: {0}")]
    Storage(String),
}

/// Port for warehouse stock quantities.
///
/// ## Contract
///
/// - `quantity_of` returns 0 when no record exists for the item — absence is
///   zero, not an error.
/// - `apply` is **all-or-nothing**: every delta in the batch is validated
///   against the current quantities first, and only then are all of them
///   committed. A single violating delta rejects the whole batch with
///   [`StockError::Insufficient`] and no quantity is mutated. The check and
///   the commit happen under one storage-level critical section, so the
///   floor-at-zero compare-and-decrement is race-free.
/// - Zero deltas are legal and produce no [`StockChange`] entry; the
///   returned changes cover exactly the items whose stock actually moved
///   (callers emit one stock-changed notification per entry).
/// - `reset`/`reset_all` set quantities to 0 unconditionally and report the
///   affected items.
///
/// No operation may leave any quantity negative at any observable point.
pub trait StockRepository: Send + Sync {
    /// Current quantity for an item; 0 if no stock record exists.
    fn quantity_of(&self, item_id: ItemId) -> Result<u32, StockError>;

    /// Validate and apply a batch of deltas atomically (all-or-nothing).
    fn apply(&self, deltas: &[StockDelta]) -> Result<Vec<StockChange>, StockError>;

    /// Set one item's quantity to 0. Returns the change (even if it was
    /// already 0, so callers can notify unconditionally).
    fn reset(&self, item_id: ItemId) -> Result<StockChange, StockError>;

    /// Set every known item's quantity to 0.
    fn reset_all(&self) -> Result<Vec<StockChange>, StockError>;
}

impl<S> StockRepository for Arc<S>
where
    S: StockRepository + ?Sized,
{
    fn quantity_of(&self, item_id: ItemId) -> Result<u32, StockError> {
        (**self).quantity_of(item_id)
    }

    fn apply(&self, deltas: &[StockDelta]) -> Result<Vec<StockChange>, StockError> {
        (**self).apply(deltas)
    }

    fn reset(&self, item_id: ItemId) -> Result<StockChange, StockError> {
        (**self).reset(item_id)
    }

    fn reset_all(&self) -> Result<Vec<StockChange>, StockError> {
        (**self).reset_all()
    }
}
