//! `seragam-catalog` — uniform catalog entries.

pub mod item;

pub use item::{Gender, Item, Level};
