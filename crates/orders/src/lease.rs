//! Advisory edit lease.
//!
//! When the Measurement role opens an order for editing, a lock timestamp is
//! recorded on the order and a time-boxed lease handed back. The lease is
//! **advisory and client-checked**: the core exposes `locked_at` and lets
//! callers ask whether a lease still looks active, but it never rejects a
//! mutating operation server-side because of one. Two editors racing inside
//! the window remain possible — preserved source behavior, tracked as an
//! open question rather than silently hardened.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use seragam_core::OrderId;

/// Fixed lease window in minutes. No automatic renewal; expiry is
/// wall-clock-based.
pub const EDIT_LOCK_MINUTES: i64 = 15;

/// A time-boxed advisory claim on an order's edit session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLease {
    order_id: OrderId,
    locked_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl EditLease {
    pub fn new(order_id: OrderId, locked_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            locked_at,
            expires_at: locked_at + Duration::minutes(EDIT_LOCK_MINUTES),
        }
    }

    /// Whether the lease still looks held at `now`. Caller UIs must re-check
    /// before every mutating action.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn locked_at(&self) -> DateTime<Utc> {
        self.locked_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lease_expires_after_the_window() {
        let locked_at = Utc::now();
        let lease = EditLease::new(OrderId::new(), locked_at);

        assert!(lease.is_active(locked_at));
        assert!(lease.is_active(locked_at + Duration::minutes(EDIT_LOCK_MINUTES - 1)));
        assert!(!lease.is_active(locked_at + Duration::minutes(EDIT_LOCK_MINUTES)));
        assert!(!lease.is_active(locked_at + Duration::hours(2)));
    }
}
