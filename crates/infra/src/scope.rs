//! Process-wide transaction scope.

use std::sync::Mutex;

use seragam_core::{DomainError, DomainResult};
use seragam_fulfillment::TransactionScope;

/// Serializes engine operations behind one mutex.
///
/// Coarse on purpose: with map-backed stores every critical section is
/// microseconds, and whole-operation serialization is what turns the
/// stores' individually-atomic steps into atomic workflow operations. A
/// database-backed deployment would replace this with real transactions.
#[derive(Default)]
pub struct SerialScope {
    gate: Mutex<()>,
}

impl SerialScope {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionScope for SerialScope {
    fn run<T, F>(&self, work: F) -> DomainResult<T>
    where
        F: FnOnce() -> DomainResult<T>,
    {
        let _guard = self
            .gate
            .lock()
            .map_err(|_| DomainError::storage("transaction scope poisoned"))?;
        work()
    }
}
