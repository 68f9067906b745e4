use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use shelfsync::bus::{EntityUpdate, Patch, UpdateBus};
use shelfsync::entity::{BookPatch, BookRecord, BookSnapshot, RelationFlags};
use shelfsync::projection::ViewProjection;
use shelfsync::types::EntityId;

fn snapshot(index: u64) -> BookSnapshot {
    BookSnapshot {
        record: BookRecord {
            id: format!("b{index}"),
            title: format!("Book {index}"),
            ..BookRecord::default()
        },
        flags: RelationFlags::default(),
    }
}

fn bench_publish_fanout(c: &mut Criterion) {
    let bus = Arc::new(UpdateBus::new());
    let mut views: Vec<ViewProjection> = (0..4)
        .map(|_| ViewProjection::new(Arc::clone(&bus)))
        .collect();
    for view in &mut views {
        view.mount_books((0..1_000).map(snapshot));
    }

    c.bench_function("publish_1k_entities_4_views", |b| {
        b.iter(|| {
            for index in 0..1_000u64 {
                bus.publish(&EntityUpdate {
                    entity: EntityId::Book(format!("b{index}")),
                    patch: Patch::Book(BookPatch {
                        upvotes: Some(index),
                        ..BookPatch::default()
                    }),
                });
            }
        });
    });
}

fn bench_mount(c: &mut Criterion) {
    c.bench_function("mount_10k_rows", |b| {
        b.iter(|| {
            let bus = Arc::new(UpdateBus::new());
            let mut view = ViewProjection::new(Arc::clone(&bus));
            view.mount_books((0..10_000).map(snapshot));
        });
    });
}

criterion_group!(benches, bench_publish_fanout, bench_mount);
criterion_main!(benches);
