use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use disperse_asset::CallContext;
use disperse_engine::{allocate, BatchRequest, DisperseContract, EngineConfig};
use disperse_nullables::{test_address, HostBuilder, NullCommitStore};
use disperse_types::{Address, PPM_DENOMINATOR, UNIT};

fn percentage_batch(n: usize) -> BatchRequest {
    let weight = PPM_DENOMINATOR / n as u128;
    let mut weights = vec![weight; n];
    weights[0] += PPM_DENOMINATOR - weight * n as u128;
    let recipients = (1..=n).map(|i| test_address(i as u8)).collect();
    BatchRequest::new(recipients, weights, true)
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_percentage");

    for n in [1, 10, 100, 250] {
        let batch = percentage_batch(n);
        group.bench_with_input(BenchmarkId::new("recipients", n), &n, |b, _| {
            b.iter(|| black_box(allocate(black_box(&batch), black_box(7 * UNIT + 3))));
        });
    }

    group.finish();
}

fn bench_disperse_native(c: &mut Criterion) {
    let mut group = c.benchmark_group("disperse_native");
    let caller = Address::new([0xaa; 20]);
    let contract = DisperseContract::new(
        Address::new([0xcc; 20]),
        EngineConfig::default(),
        NullCommitStore::new(),
    );

    for n in [1, 10, 100] {
        let batch = percentage_batch(n);
        let host = HostBuilder::new().native(caller, 1_000 * UNIT).build();
        group.bench_with_input(BenchmarkId::new("recipients", n), &n, |b, _| {
            b.iter(|| {
                let mut host = host.clone();
                black_box(
                    contract
                        .disperse_native(&mut host, &CallContext::with_value(caller, UNIT), &batch)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_allocate, bench_disperse_native);
criterion_main!(benches);
