//! # Asset Ledger Benchmarks
//!
//! | Operation | Cost driver |
//! |-----------|-------------|
//! | checkout + return | Two hash-linked appends, two atomic batches |
//! | read | One point lookup |
//! | read_history | Prefix scan over the asset's rows |
//! | verify_history | Prefix scan plus full chain replay |

use asset_ledger::{AssetLedgerApi, AssetLedgerService, AssetRegistry, LedgerConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn ledger_with_history(cycles: usize) -> impl AssetLedgerApi {
    let service =
        AssetLedgerService::new_in_memory(AssetRegistry::default_inventory(), LedgerConfig::default())
            .unwrap();
    service.init().unwrap();
    for i in 0..cycles {
        service.write("pc_a", &format!("holder_{i}")).unwrap();
        service.write("pc_a", "available").unwrap();
    }
    service
}

fn bench_checkout_return_cycle(c: &mut Criterion) {
    let ledger = ledger_with_history(0);

    let mut group = c.benchmark_group("ledger_write");
    group.throughput(Throughput::Elements(2));
    group.bench_function("checkout_return", |b| {
        b.iter(|| {
            ledger.write(black_box("wifi_a"), black_box("alice")).unwrap();
            ledger.write(black_box("wifi_a"), black_box("available")).unwrap();
        })
    });
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let ledger = ledger_with_history(100);

    c.bench_function("ledger_read", |b| {
        b.iter(|| black_box(ledger.read(black_box("pc_a")).unwrap()))
    });
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_history");

    for cycles in [10usize, 100, 1_000] {
        let ledger = ledger_with_history(cycles);
        group.throughput(Throughput::Elements((cycles * 2) as u64));

        group.bench_with_input(BenchmarkId::new("read_history", cycles), &cycles, |b, _| {
            b.iter(|| black_box(ledger.read_history("pc_a").unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("verify_history", cycles), &cycles, |b, _| {
            b.iter(|| black_box(ledger.verify_history("pc_a").unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_checkout_return_cycle, bench_read, bench_history);
criterion_main!(benches);
