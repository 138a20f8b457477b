//! Criterion benchmarks for insertion prediction.
//!
//! Two benchmark groups:
//! - `empty_chest`: 54-slot destination, no shipments in flight
//! - `busy_destination`: 54-slot destination with 32 shipments in flight

use criterion::{Criterion, criterion_group, criterion_main};
use transit_core::id::WorldId;
use transit_core::network::TransporterNetwork;
use transit_core::request::TransitRequest;
use transit_core::shipment::{BlockPos, PathKind, Side};
use transit_core::test_utils::*;

const TARGET: BlockPos = BlockPos::new(0, 64, 0);

fn mixed_request() -> TransitRequest {
    let mut request = TransitRequest::new();
    request.push(stack(tablet(), 3));
    request.push(stack(pearl(), 16));
    request.push(stack(cobble(), 64));
    request
}

fn bench_empty_chest(c: &mut Criterion) {
    let items = test_registry();
    let net = TransporterNetwork::new(WorldId(0));
    let chest = TestInventory::uniform(54, 64).honoring_stack_caps();
    let request = mixed_request();

    c.bench_function("empty_chest", |b| {
        b.iter(|| net.predict(&items, TARGET, Side::Up, &chest, &request))
    });
}

fn bench_busy_destination(c: &mut Criterion) {
    let items = test_registry();
    let mut net = TransporterNetwork::new(WorldId(0));
    for i in 0..32 {
        let item = if i % 2 == 0 { cobble() } else { ingot() };
        net.launch(stack(item, 48), TARGET, Side::Up, PathKind::Active);
    }
    let chest = TestInventory::uniform(54, 64).honoring_stack_caps();
    let request = mixed_request();

    c.bench_function("busy_destination", |b| {
        b.iter(|| net.predict(&items, TARGET, Side::Up, &chest, &request))
    });
}

criterion_group!(benches, bench_empty_chest, bench_busy_destination);
criterion_main!(benches);
