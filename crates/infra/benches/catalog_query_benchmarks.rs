use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catalogd_core::{Money, Product};
use catalogd_infra::flags::{FaultInjectionGate, InMemoryFlagProvider};
use catalogd_infra::query::CatalogQueryEngine;
use catalogd_infra::read_model::CatalogStore;
use catalogd_observability::CatalogMetrics;
use std::sync::Arc;

fn synthetic_catalog(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| {
            Product::new(
                format!("P{i:06}"),
                format!("Product {i}"),
                format!("Synthetic description number {i} for a telescope accessory"),
            )
            .with_price(Money::usd((i % 500) as i64, 0))
            .with_categories(["synthetic"])
        })
        .collect()
}

fn engine(n: usize) -> CatalogQueryEngine {
    CatalogQueryEngine::new(
        Arc::new(CatalogStore::with_products(synthetic_catalog(n))),
        FaultInjectionGate::new(Arc::new(InMemoryFlagProvider::new())),
        Arc::new(CatalogMetrics::new()),
    )
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for size in [100usize, 1_000, 10_000] {
        let engine = engine(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("hit_all", size), &size, |b, _| {
            b.iter(|| black_box(engine.search(black_box("TELESCOPE"))))
        });
        group.bench_with_input(BenchmarkId::new("miss", size), &size, |b, _| {
            b.iter(|| black_box(engine.search(black_box("binoculars"))))
        });
    }
    group.finish();
}

fn bench_get_by_id(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    let mut group = c.benchmark_group("get_by_id");
    for size in [100usize, 1_000, 10_000] {
        let engine = engine(size);
        let last = format!("P{:06}", size - 1);
        group.bench_with_input(BenchmarkId::new("last_product", size), &size, |b, _| {
            b.iter(|| black_box(runtime.block_on(engine.get_by_id(black_box(&last)))))
        });
    }
    group.finish();
}

fn bench_replace(c: &mut Criterion) {
    let store = CatalogStore::new();
    let catalog = synthetic_catalog(1_000);
    c.bench_function("replace_1000", |b| {
        b.iter(|| black_box(store.replace(catalog.clone())))
    });
}

criterion_group!(benches, bench_search, bench_get_by_id, bench_replace);
criterion_main!(benches);
