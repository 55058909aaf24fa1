//! Sequential, zero-padded order numbers.

use serde::{Deserialize, Serialize};

use seragam_core::{DomainError, DomainResult};

/// Unique order number, generated sequentially and zero-padded
/// (e.g. `ORD-00042`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

const PREFIX: &str = "ORD-";

impl OrderNumber {
    /// Build the number for a 1-based sequence position.
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("{PREFIX}{seq:05}"))
    }

    /// Parse a stored/displayed number back (e.g. from a route parameter).
    pub fn parse(s: &str) -> DomainResult<Self> {
        let digits = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| DomainError::invalid_id(format!("order number: {s}")))?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!("order number: {s}")));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padded_to_five_digits() {
        assert_eq!(OrderNumber::from_seq(1).as_str(), "ORD-00001");
        assert_eq!(OrderNumber::from_seq(42).as_str(), "ORD-00042");
        assert_eq!(OrderNumber::from_seq(123_456).as_str(), "ORD-123456");
    }

    #[test]
    fn parse_round_trips_and_rejects_garbage() {
        let n = OrderNumber::parse("ORD-00007").unwrap();
        assert_eq!(n, OrderNumber::from_seq(7));

        assert!(OrderNumber::parse("00007").is_err());
        assert!(OrderNumber::parse("ORD-").is_err());
        assert!(OrderNumber::parse("ORD-7a").is_err());
    }
}
