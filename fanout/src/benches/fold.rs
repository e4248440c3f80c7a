use commonware_fanout::{Concurrent, Sequential, Strategy};
use criterion::{criterion_group, Criterion};
use std::{hint::black_box, num::NonZeroUsize};

fn bench_fold(c: &mut Criterion) {
    let concurrent = Concurrent::new(NonZeroUsize::new(8).unwrap()).unwrap();
    for n in [100, 1_000, 10_000, 100_000] {
        let items: Vec<u64> = (0..n).collect();
        c.bench_function(&format!("{}/n={} conc=1", module_path!(), n), |b| {
            b.iter(|| {
                black_box(Sequential.fold(
                    &items,
                    || 0u64,
                    |acc, x| acc.wrapping_add(*x),
                    |a, b| a.wrapping_add(b),
                ))
            });
        });
        c.bench_function(&format!("{}/n={} conc=8", module_path!(), n), |b| {
            b.iter(|| {
                black_box(concurrent.fold(
                    &items,
                    || 0u64,
                    |acc, x| acc.wrapping_add(*x),
                    |a, b| a.wrapping_add(b),
                ))
            });
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_fold,
}
