//! `seragam-infra` — in-memory adapters for the storage and transaction
//! seams.
//!
//! Map-backed stores behind the same traits a database-backed deployment
//! would implement. The [`SerialScope`] serializes whole engine operations,
//! which is what makes the stores' individually-atomic steps compose into
//! all-or-nothing workflow operations.

pub mod order_store;
pub mod scope;
pub mod stock_store;

pub use order_store::InMemoryOrderStore;
pub use scope::SerialScope;
pub use stock_store::InMemoryStockStore;
