//! Map-backed order store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use seragam_core::{AggregateRoot, DomainError, DomainResult, ExpectedVersion, OrderId};
use seragam_orders::{Order, OrderNumber, OrderRepository};

/// In-memory [`OrderRepository`] with optimistic version checking and a
/// monotonic number sequence.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
    seq: AtomicU64,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderStore {
    fn load(&self, id: OrderId) -> DomainResult<Order> {
        let orders = self
            .orders
            .read()
            .map_err(|_| DomainError::storage("order store lock poisoned"))?;
        orders
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))
    }

    fn insert(&self, order: &Order) -> DomainResult<()> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| DomainError::storage("order store lock poisoned"))?;
        if orders.contains_key(&order.id_typed()) {
            return Err(DomainError::validation(format!(
                "order {} already exists",
                order.id_typed()
            )));
        }
        orders.insert(order.id_typed(), order.clone());
        Ok(())
    }

    fn update(&self, order: &Order, expected: ExpectedVersion) -> DomainResult<()> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| DomainError::storage("order store lock poisoned"))?;
        let stored = orders
            .get(&order.id_typed())
            .ok_or_else(|| DomainError::not_found(format!("order {}", order.id_typed())))?;
        expected.check(stored.version())?;
        orders.insert(order.id_typed(), order.clone());
        Ok(())
    }

    fn next_order_number(&self) -> DomainResult<OrderNumber> {
        // 1-based; fetch_add returns the previous value.
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(OrderNumber::from_seq(seq))
    }

    fn list(&self) -> DomainResult<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|_| DomainError::storage("order store lock poisoned"))?;
        Ok(orders.values().cloned().collect())
    }
}
