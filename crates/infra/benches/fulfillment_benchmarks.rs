use std::sync::Arc;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use seragam_catalog::{Gender, Level};
use seragam_core::ItemId;
use seragam_events::InMemoryEventBus;
use seragam_fulfillment::{FulfillmentEngine, NewOrder, ProvidedQty, WorkflowEvent};
use seragam_infra::{InMemoryOrderStore, InMemoryStockStore, SerialScope};
use seragam_orders::{ItemStatus, NewOrderLine, OrderStatus, recompute_status};

fn bench_recompute_status(c: &mut Criterion) {
    let statuses: Vec<ItemStatus> = (0..64)
        .map(|i| match i % 3 {
            0 => ItemStatus::Completed,
            1 => ItemStatus::Pending,
            _ => ItemStatus::Uncompleted,
        })
        .collect();

    c.bench_function("recompute_status/64_items", |b| {
        b.iter(|| recompute_status(OrderStatus::InProgress, std::hint::black_box(&statuses)))
    });
}

fn bench_complete_review(c: &mut Criterion) {
    c.bench_function("complete_review/8_lines", |b| {
        b.iter_batched(
            || {
                let bus: Arc<InMemoryEventBus<WorkflowEvent>> =
                    Arc::new(InMemoryEventBus::new());
                let engine = FulfillmentEngine::new(
                    Arc::new(InMemoryOrderStore::new()),
                    Arc::new(InMemoryStockStore::new()),
                    Arc::new(SerialScope::new()),
                    bus,
                );

                let lines: Vec<NewOrderLine> = (0..8)
                    .map(|i| {
                        let item_id = ItemId::new();
                        engine.increase_stock(item_id, 100).unwrap();
                        NewOrderLine {
                            item_id,
                            item_name: format!("Item {i}"),
                            qty_requested: 5,
                        }
                    })
                    .collect();
                let order = engine
                    .create_order(NewOrder {
                        student_name: "Benchmark".to_string(),
                        level: Level::Sd,
                        gender: Gender::Male,
                        lines,
                    })
                    .unwrap();
                let batch: Vec<ProvidedQty> = order
                    .items()
                    .iter()
                    .map(|item| ProvidedQty {
                        order_item_id: item.id_typed(),
                        qty_provided: 5,
                        base_qty: None,
                    })
                    .collect();
                (engine, order.id_typed(), batch)
            },
            |(engine, order_id, batch)| {
                engine.complete_review(order_id, batch).unwrap();
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_recompute_status, bench_complete_review);
criterion_main!(benches);
