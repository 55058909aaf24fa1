//! Map-backed stock store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use seragam_core::ItemId;
use seragam_stock::{StockChange, StockDelta, StockError, StockRepository};

/// In-memory [`StockRepository`].
///
/// `apply` validates the whole batch against a scratch copy of the map and
/// swaps it in only when every delta passed, all under one lock. Deltas
/// accumulate within a batch (two deltas for the same item see each other),
/// and a rejected batch leaves every quantity untouched.
#[derive(Default)]
pub struct InMemoryStockStore {
    quantities: Mutex<HashMap<ItemId, u32>>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ItemId, u32>>, StockError> {
        self.quantities
            .lock()
            .map_err(|_| StockError::Storage("stock store lock poisoned".to_string()))
    }
}

impl StockRepository for InMemoryStockStore {
    fn quantity_of(&self, item_id: ItemId) -> Result<u32, StockError> {
        Ok(self.lock()?.get(&item_id).copied().unwrap_or(0))
    }

    fn apply(&self, deltas: &[StockDelta]) -> Result<Vec<StockChange>, StockError> {
        let mut map = self.lock()?;
        let mut scratch = map.clone();
        let mut touched: Vec<ItemId> = Vec::new();

        for delta in deltas {
            let current = i64::from(scratch.get(&delta.item_id).copied().unwrap_or(0));
            let next = current + delta.delta;
            if next < 0 {
                return Err(StockError::Insufficient {
                    item_id: delta.item_id,
                    available: current as u32,
                    requested: (-delta.delta) as u32,
                });
            }
            if delta.delta != 0 {
                scratch.insert(delta.item_id, next as u32);
                if !touched.contains(&delta.item_id) {
                    touched.push(delta.item_id);
                }
            }
        }

        let changes = touched
            .iter()
            .map(|item_id| StockChange {
                item_id: *item_id,
                quantity: scratch.get(item_id).copied().unwrap_or(0),
            })
            .collect();
        *map = scratch;
        Ok(changes)
    }

    fn reset(&self, item_id: ItemId) -> Result<StockChange, StockError> {
        self.lock()?.insert(item_id, 0);
        Ok(StockChange {
            item_id,
            quantity: 0,
        })
    }

    fn reset_all(&self) -> Result<Vec<StockChange>, StockError> {
        let mut map = self.lock()?;
        let changes = map
            .keys()
            .map(|item_id| StockChange {
                item_id: *item_id,
                quantity: 0,
            })
            .collect();
        for qty in map.values_mut() {
            *qty = 0;
        }
        Ok(changes)
    }
}
