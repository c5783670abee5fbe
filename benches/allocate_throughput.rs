//! Benchmarks for table name allocation.
//!
//! Run with: cargo bench
//! View results in: target/criterion/report/index.html

use std::collections::HashSet;

use blanktable::naming::{parse_count, NameAllocator, MAX_BATCH};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Existing names where the first `taken` scheme names are in use.
fn dense_existing(taken: u64) -> HashSet<String> {
    (1..=taken).map(|i| format!("空白表{}", i)).collect()
}

/// Existing names where every other scheme name is in use.
fn sparse_existing(taken: u64) -> HashSet<String> {
    (1..=taken).map(|i| format!("空白表{}", i * 2)).collect()
}

// =============================================================================
// Allocation Benchmarks
// =============================================================================

fn bench_allocate_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_dense");
    let allocator: NameAllocator = NameAllocator::default();

    for taken in [0u64, 100, 1_000, 10_000].iter() {
        let existing = dense_existing(*taken);

        group.throughput(Throughput::Elements(MAX_BATCH as u64));
        group.bench_with_input(BenchmarkId::from_parameter(taken), taken, |b, _| {
            b.iter(|| allocator.allocate(black_box(MAX_BATCH), &existing).unwrap());
        });
    }

    group.finish();
}

fn bench_allocate_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_sparse");
    let allocator: NameAllocator = NameAllocator::default();

    for taken in [100u64, 1_000, 10_000].iter() {
        let existing = sparse_existing(*taken);

        group.throughput(Throughput::Elements(MAX_BATCH as u64));
        group.bench_with_input(BenchmarkId::from_parameter(taken), taken, |b, _| {
            b.iter(|| allocator.allocate(black_box(MAX_BATCH), &existing).unwrap());
        });
    }

    group.finish();
}

fn bench_parse_count(c: &mut Criterion) {
    c.bench_function("parse_count", |b| {
        b.iter(|| parse_count(black_box(" 42 ")))
    });
}

criterion_group!(
    benches,
    bench_allocate_dense,
    bench_allocate_sparse,
    bench_parse_count,
);
criterion_main!(benches);
