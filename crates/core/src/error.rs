//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Focused on deterministic, business/domain failures (validation,
/// invariants, stock shortfalls); `Storage` is the one escape hatch for
/// backend failures that must surface through domain call paths. Every
/// variant carries a human-readable reference so callers can build
/// role-appropriate messages without re-querying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A quantity violates its bounds (negative delta baseline, provided
    /// above requested, zero request). Rejected before any mutation.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A requested stock decrement exceeds the available quantity.
    /// Aborts the whole fulfillment batch.
    #[error("insufficient stock for {item}")]
    InsufficientStock { item: String },

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced order/item/stock record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stale-state write was rejected; the caller must retry with fresh
    /// data (optimistic concurrency).
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// The storage backend failed (lock poisoning, connection loss).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn insufficient_stock(item: impl Into<String>) -> Self {
        Self::InsufficientStock { item: item.into() }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(reference: impl Into<String>) -> Self {
        Self::NotFound(reference.into())
    }

    pub fn concurrent(msg: impl Into<String>) -> Self {
        Self::ConcurrentModification(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
