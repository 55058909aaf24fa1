//! Post-commit notification fan-out.

use tracing::{debug, warn};

use seragam_events::{Event, EventBus};

use crate::event::WorkflowEvent;

/// Publishes workflow events after a state mutation has committed.
///
/// Fire-and-forget: a failed publish is logged and swallowed, never
/// propagated. A notification must not be able to roll back or block a
/// committed change.
pub struct NotificationEmitter<B> {
    bus: B,
}

impl<B: EventBus<WorkflowEvent>> NotificationEmitter<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn emit(&self, event: WorkflowEvent) {
        let kind = event.event_type();
        match self.bus.publish(event) {
            Ok(()) => debug!(event = kind, "notification published"),
            Err(err) => warn!(event = kind, error = ?err, "notification dropped"),
        }
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = WorkflowEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use seragam_core::ItemId;
    use seragam_events::InMemoryEventBus;
    use seragam_stock::StockChange;
    use std::sync::Arc;

    fn stock_event() -> WorkflowEvent {
        WorkflowEvent::stock_changed(
            StockChange {
                item_id: ItemId::new(),
                quantity: 7,
            },
            Utc::now(),
        )
    }

    #[test]
    fn emitted_events_reach_subscribers() {
        let bus = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let emitter = NotificationEmitter::new(bus);

        emitter.emit(stock_event());
        let received = sub.drain();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].event_type(), "stock-changed");
    }

    #[test]
    fn emit_never_fails_without_subscribers() {
        let emitter = NotificationEmitter::new(Arc::new(InMemoryEventBus::new()));
        emitter.emit(stock_event());
        emitter.emit_all(vec![stock_event(), stock_event()]);
    }
}
