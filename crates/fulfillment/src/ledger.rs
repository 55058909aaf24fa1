//! Thin domain facade over the stock port.
//!
//! Builds delta batches for the common adjustment shapes and keeps the
//! [`StockError`] → [`DomainError`] mapping in one place. Errors stay as
//! [`StockError`] at this level so the engine can re-map an insufficiency to
//! a human-readable item name when it has an order in hand.

use tracing::debug;

use seragam_core::{DomainError, ItemId};
use seragam_stock::{StockChange, StockDelta, StockError, StockRepository};

/// Map a stock port error into the domain error model. The insufficiency
/// reference is the item id; callers with a name snapshot available should
/// prefer their own mapping.
pub fn to_domain(err: StockError) -> DomainError {
    match err {
        StockError::Insufficient { item_id, .. } => {
            DomainError::insufficient_stock(item_id.to_string())
        }
        StockError::Storage(msg) => DomainError::storage(msg),
    }
}

pub struct StockLedger<S> {
    stock: S,
}

impl<S: StockRepository> StockLedger<S> {
    pub fn new(stock: S) -> Self {
        Self { stock }
    }

    pub fn quantity_of(&self, item_id: ItemId) -> Result<u32, StockError> {
        self.stock.quantity_of(item_id)
    }

    /// Apply a prepared batch atomically.
    pub fn apply(&self, deltas: &[StockDelta]) -> Result<Vec<StockChange>, StockError> {
        let changes = self.stock.apply(deltas)?;
        debug!(deltas = deltas.len(), moved = changes.len(), "stock batch applied");
        Ok(changes)
    }

    pub fn increase(&self, item_id: ItemId, qty: u32) -> Result<Vec<StockChange>, StockError> {
        self.apply(&[StockDelta::new(item_id, i64::from(qty))])
    }

    pub fn decrease(&self, item_id: ItemId, qty: u32) -> Result<Vec<StockChange>, StockError> {
        self.apply(&[StockDelta::new(item_id, -i64::from(qty))])
    }

    /// Put returned/cancelled quantities back. Increments only, so this
    /// cannot hit an insufficiency.
    pub fn restore(&self, quantities: &[(ItemId, u32)]) -> Result<Vec<StockChange>, StockError> {
        let deltas: Vec<StockDelta> = quantities
            .iter()
            .map(|(item_id, qty)| StockDelta::new(*item_id, i64::from(*qty)))
            .collect();
        self.apply(&deltas)
    }

    pub fn reset(&self, item_id: ItemId) -> Result<StockChange, StockError> {
        self.stock.reset(item_id)
    }

    pub fn reset_all(&self) -> Result<Vec<StockChange>, StockError> {
        self.stock.reset_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Minimal map-backed stock port for exercising the facade.
    struct MapStock {
        quantities: Mutex<HashMap<ItemId, u32>>,
    }

    impl MapStock {
        fn with(item_id: ItemId, qty: u32) -> Self {
            Self {
                quantities: Mutex::new(HashMap::from([(item_id, qty)])),
            }
        }
    }

    impl StockRepository for MapStock {
        fn quantity_of(&self, item_id: ItemId) -> Result<u32, StockError> {
            Ok(*self.quantities.lock().unwrap().get(&item_id).unwrap_or(&0))
        }

        fn apply(&self, deltas: &[StockDelta]) -> Result<Vec<StockChange>, StockError> {
            let mut map = self.quantities.lock().unwrap();
            let mut scratch = map.clone();
            let mut changes = Vec::new();
            for delta in deltas {
                let current = i64::from(*scratch.get(&delta.item_id).unwrap_or(&0));
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
                    changes.push(StockChange {
                        item_id: delta.item_id,
                        quantity: next as u32,
                    });
                }
            }
            *map = scratch;
            Ok(changes)
        }

        fn reset(&self, item_id: ItemId) -> Result<StockChange, StockError> {
            self.quantities.lock().unwrap().insert(item_id, 0);
            Ok(StockChange {
                item_id,
                quantity: 0,
            })
        }

        fn reset_all(&self) -> Result<Vec<StockChange>, StockError> {
            let mut map = self.quantities.lock().unwrap();
            let changes = map
                .keys()
                .map(|id| StockChange {
                    item_id: *id,
                    quantity: 0,
                })
                .collect();
            for qty in map.values_mut() {
                *qty = 0;
            }
            Ok(changes)
        }
    }

    #[test]
    fn decrease_floors_at_zero() {
        let item = ItemId::new();
        let ledger = StockLedger::new(MapStock::with(item, 3));

        let err = ledger.decrease(item, 5).unwrap_err();
        assert!(matches!(err, StockError::Insufficient { available: 3, requested: 5, .. }));
        assert_eq!(ledger.quantity_of(item).unwrap(), 3);

        ledger.decrease(item, 3).unwrap();
        assert_eq!(ledger.quantity_of(item).unwrap(), 0);
    }

    #[test]
    fn restore_reports_new_quantities() {
        let a = ItemId::new();
        let b = ItemId::new();
        let ledger = StockLedger::new(MapStock::with(a, 1));

        let changes = ledger.restore(&[(a, 2), (b, 4)]).unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(ledger.quantity_of(a).unwrap(), 3);
        assert_eq!(ledger.quantity_of(b).unwrap(), 4);
    }

    #[test]
    fn insufficiency_maps_to_domain_error_with_item_reference() {
        let item = ItemId::new();
        let err = to_domain(StockError::Insufficient {
            item_id: item,
            available: 0,
            requested: 1,
        });
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                item: item.to_string()
            }
        );
    }
}
