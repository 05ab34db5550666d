use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tabletime::{
    auth::AdminCredentials,
    floor::Floor,
    sync::{ClientEvent, Dispatcher, TablePayload},
};

fn table(id: u32) -> TablePayload {
    TablePayload {
        id: Some(id),
        table_identifier: None,
    }
}

/// One full seat / bill / clear cycle on every table
fn full_service(dispatcher: &mut Dispatcher) {
    let ids: Vec<u32> = dispatcher.floor().store.iter().map(|t| t.id).collect();
    for id in ids {
        dispatcher.handle_at(ClientEvent::StartTable(table(id)), 1);
        dispatcher.handle_at(ClientEvent::BillTable(table(id)), 2);
        dispatcher.handle_at(ClientEvent::ClearTable(table(id)), 3);
    }
}

fn bench_dispatch(c: &mut Criterion) {
    c.bench_function("full_service_cycle", |b| {
        let mut dispatcher = Dispatcher::new(Floor::standard(), AdminCredentials::default());
        b.iter(|| full_service(&mut dispatcher));
    });

    c.bench_function("decode_start_table", |b| {
        b.iter(|| ClientEvent::decode(r#"{"event":"start_table","data":{"id":"12"}}"#))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_json");
    for recent in [0usize, 10] {
        let mut dispatcher = Dispatcher::new(Floor::standard(), AdminCredentials::default());
        for id in (1..=22).filter(|id| *id != 13 && *id != 17).take(recent) {
            dispatcher.handle_at(ClientEvent::ClearTable(table(id)), 0);
        }
        group.bench_with_input(BenchmarkId::from_parameter(recent), &dispatcher, |b, d| {
            b.iter(|| serde_json::to_string(&d.snapshot()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_snapshot);
criterion_main!(benches);
