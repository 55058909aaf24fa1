//! `seragam-stock` — warehouse stock port.
//!
//! Stock is one non-negative quantity per catalog item, owned exclusively by
//! implementations of [`StockRepository`]. Absence of a record reads as zero
//! (not an error); quantities are mutated only through validated batch
//! deltas or explicit resets, never direct assignment.

pub mod repository;

pub use repository::{StockChange, StockDelta, StockError, StockRepository};
