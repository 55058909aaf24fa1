//! Storage seam for orders.

use std::sync::Arc;

use seragam_core::{DomainResult, ExpectedVersion, OrderId};

use crate::number::OrderNumber;
use crate::order::Order;

/// Order persistence. In-memory for now; the seam exists so the fulfillment
/// engine never touches storage directly.
///
/// `update` takes the caller's [`ExpectedVersion`] and must fail with
/// [`seragam_core::DomainError::ConcurrentModification`] when the stored
/// version has moved past it.
pub trait OrderRepository: Send + Sync {
    /// Load one order. `NotFound` when the id is unknown.
    fn load(&self, id: OrderId) -> DomainResult<Order>;

    /// Insert a freshly created order. `Validation` error on duplicate id.
    fn insert(&self, order: &Order) -> DomainResult<()>;

    /// Persist a mutated order, checking the expected version.
    fn update(&self, order: &Order, expected: ExpectedVersion) -> DomainResult<()>;

    /// Allocate the next sequential order number.
    fn next_order_number(&self) -> DomainResult<OrderNumber>;

    /// Snapshot of all orders, unordered.
    fn list(&self) -> DomainResult<Vec<Order>>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn load(&self, id: OrderId) -> DomainResult<Order> {
        (**self).load(id)
    }

    fn insert(&self, order: &Order) -> DomainResult<()> {
        (**self).insert(order)
    }

    fn update(&self, order: &Order, expected: ExpectedVersion) -> DomainResult<()> {
        (**self).update(order, expected)
    }

    fn next_order_number(&self) -> DomainResult<OrderNumber> {
        (**self).next_order_number()
    }

    fn list(&self) -> DomainResult<Vec<Order>> {
        (**self).list()
    }
}
