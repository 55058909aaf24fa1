//! Item- and order-level fulfillment statuses, with pure derivation rules.

use serde::{Deserialize, Serialize};

/// Per-line fulfillment state.
///
/// `InProgress` is only the initial, pre-review default; once QC has acted
/// on a line its status is always derived from provided vs requested and
/// never goes back to `InProgress` through derivation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    InProgress,
    Pending,
    Completed,
    Uncompleted,
}

impl ItemStatus {
    /// Derive the status for a line from its quantities.
    ///
    /// - `provided == 0` → `Pending`
    /// - `0 < provided < requested` → `Uncompleted`
    /// - `provided == requested` → `Completed`
    ///
    /// Callers guarantee `provided <= requested` and `requested >= 1`
    /// ([`crate::OrderItem`] enforces both).
    pub fn derive(provided: u32, requested: u32) -> Self {
        if provided == 0 {
            ItemStatus::Pending
        } else if provided < requested {
            ItemStatus::Uncompleted
        } else {
            ItemStatus::Completed
        }
    }
}

/// Aggregate lifecycle state of an order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    InProgress,
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// `Cancelled` is the only terminal order status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }
}

/// Aggregate an order's status from a snapshot of its item statuses.
///
/// - `Cancelled` is sticky: once terminal, never recomputed.
/// - All items `Completed` → `Completed`.
/// - Any item `Pending` **or** `Uncompleted` → `Pending` (uncompleted lines
///   keep the order in a "needs stock" pending state rather than a separate
///   bucket — preserved source behavior).
/// - Otherwise → `InProgress`. An empty snapshot stays `InProgress`; orders
///   always carry at least one line, this just keeps the function total.
///
/// Runs after every whole batch of item updates, never mid-batch.
pub fn recompute_status(current: OrderStatus, item_statuses: &[ItemStatus]) -> OrderStatus {
    if current.is_terminal() {
        return current;
    }

    if !item_statuses.is_empty()
        && item_statuses.iter().all(|s| *s == ItemStatus::Completed)
    {
        OrderStatus::Completed
    } else if item_statuses
        .iter()
        .any(|s| matches!(s, ItemStatus::Pending | ItemStatus::Uncompleted))
    {
        OrderStatus::Pending
    } else {
        OrderStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derive_matches_quantity_rule() {
        assert_eq!(ItemStatus::derive(0, 5), ItemStatus::Pending);
        assert_eq!(ItemStatus::derive(3, 5), ItemStatus::Uncompleted);
        assert_eq!(ItemStatus::derive(5, 5), ItemStatus::Completed);
        assert_eq!(ItemStatus::derive(1, 1), ItemStatus::Completed);
    }

    #[test]
    fn cancelled_is_sticky() {
        let statuses = [ItemStatus::Completed, ItemStatus::Completed];
        assert_eq!(
            recompute_status(OrderStatus::Cancelled, &statuses),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn all_completed_yields_completed() {
        let statuses = [ItemStatus::Completed, ItemStatus::Completed];
        assert_eq!(
            recompute_status(OrderStatus::InProgress, &statuses),
            OrderStatus::Completed
        );
    }

    #[test]
    fn any_pending_or_uncompleted_yields_pending() {
        assert_eq!(
            recompute_status(
                OrderStatus::InProgress,
                &[ItemStatus::Completed, ItemStatus::Pending]
            ),
            OrderStatus::Pending
        );
        assert_eq!(
            recompute_status(
                OrderStatus::InProgress,
                &[ItemStatus::Completed, ItemStatus::Uncompleted]
            ),
            OrderStatus::Pending
        );
    }

    #[test]
    fn untouched_lines_keep_order_in_progress() {
        assert_eq!(
            recompute_status(
                OrderStatus::Pending,
                &[ItemStatus::Completed, ItemStatus::InProgress]
            ),
            OrderStatus::InProgress
        );
        assert_eq!(recompute_status(OrderStatus::InProgress, &[]), OrderStatus::InProgress);
    }

    fn arb_item_status() -> impl Strategy<Value = ItemStatus> {
        prop_oneof![
            Just(ItemStatus::InProgress),
            Just(ItemStatus::Pending),
            Just(ItemStatus::Completed),
            Just(ItemStatus::Uncompleted),
        ]
    }

    fn arb_live_order_status() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::InProgress),
            Just(OrderStatus::Pending),
            Just(OrderStatus::Completed),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: derivation returns Pending iff provided == 0,
        /// Completed iff provided == requested, Uncompleted otherwise.
        #[test]
        fn derivation_correctness(requested in 1u32..1000, provided_raw in 0u32..1000) {
            let provided = provided_raw.min(requested);
            let status = ItemStatus::derive(provided, requested);

            if provided == 0 {
                prop_assert_eq!(status, ItemStatus::Pending);
            } else if provided == requested {
                prop_assert_eq!(status, ItemStatus::Completed);
            } else {
                prop_assert_eq!(status, ItemStatus::Uncompleted);
            }
        }

        /// Property: aggregation yields Completed iff all items completed,
        /// Pending iff any pending/uncompleted (and not all completed),
        /// InProgress otherwise.
        #[test]
        fn aggregation_correctness(
            current in arb_live_order_status(),
            statuses in prop::collection::vec(arb_item_status(), 1..12),
        ) {
            let result = recompute_status(current, &statuses);

            let all_completed = statuses.iter().all(|s| *s == ItemStatus::Completed);
            let any_needs_stock = statuses
                .iter()
                .any(|s| matches!(s, ItemStatus::Pending | ItemStatus::Uncompleted));

            if all_completed {
                prop_assert_eq!(result, OrderStatus::Completed);
            } else if any_needs_stock {
                prop_assert_eq!(result, OrderStatus::Pending);
            } else {
                prop_assert_eq!(result, OrderStatus::InProgress);
            }
        }
    }
}
