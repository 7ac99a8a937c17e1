use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leaderless_register::prelude::*;
use leaderless_register::Simulation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bench_apply_single_writer(c: &mut Criterion) {
    c.bench_function("VersionStore::apply x1000 (single writer)", |b| {
        b.iter(|| {
            let mut store = VersionStore::new();
            let mut baseline = None;
            for i in 0..1000u32 {
                let resp = store.apply(WriteRequest::new(baseline, vec![i]));
                baseline = Some(resp.version);
            }
            black_box(store.sibling_count())
        })
    });
}

fn bench_apply_sibling_buildup(c: &mut Criterion) {
    // First writes never prune, so every entry stays a sibling.
    c.bench_function("VersionStore::apply x500 (no baseline)", |b| {
        b.iter(|| {
            let mut store = VersionStore::new();
            for i in 0..500u32 {
                store.apply(WriteRequest::new(None, vec![i]));
            }
            black_box(store.sibling_count())
        })
    });
}

fn bench_client_merge(c: &mut Criterion) {
    let response = WriteResponse {
        version: 100,
        payloads: (0..100u32)
            .map(|i| (i..i + 50).collect::<Vec<_>>())
            .collect(),
    };

    c.bench_function("ReplicaClient::merge 100 siblings", |b| {
        b.iter(|| {
            let mut client = ReplicaClient::new("bench");
            client.merge(&response);
            black_box(client.len())
        })
    });
}

fn bench_random_workload(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let ops: Vec<(String, u32)> = (0..1000)
        .map(|_| (format!("client_{}", rng.gen_range(1..=5)), rng.gen_range(0..20)))
        .collect();
    let names: Vec<String> = (1..=5).map(|i| format!("client_{i}")).collect();

    c.bench_function("Simulation::run 5 clients x1000 writes", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(names.iter().cloned());
            let transcript = sim.run(ops.iter().cloned()).unwrap_or_default();
            black_box(transcript.len())
        })
    });
}

criterion_group!(
    benches,
    bench_apply_single_writer,
    bench_apply_sibling_buildup,
    bench_client_merge,
    bench_random_workload,
);
criterion_main!(benches);
