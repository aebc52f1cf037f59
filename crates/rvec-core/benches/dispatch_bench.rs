//! Benchmarks for mutation + dispatch.
//!
//! Run with: cargo bench -p rvec-core --bench dispatch_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rvec_core::{EventKinds, ReactiveVec};
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

// =============================================================================
// push with N subscribers
// =============================================================================

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("reactive_vec/push");
    const OPS: usize = 1_000;
    group.throughput(Throughput::Elements(OPS as u64));

    for subscribers in [0usize, 1, 8] {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &subscribers| {
                b.iter(|| {
                    let mut vec = ReactiveVec::with_capacity(OPS);
                    let hits = Rc::new(Cell::new(0u64));
                    let _subs: Vec<_> = (0..subscribers)
                        .map(|_| {
                            let hits = Rc::clone(&hits);
                            vec.subscribe(EventKinds::INSERTED, move |_| hits.set(hits.get() + 1))
                        })
                        .collect();
                    for i in 0..OPS {
                        vec.push(black_box(i));
                    }
                    black_box(hits.get())
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// filtered dispatch: subscribers that never match
// =============================================================================

fn bench_filtered_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("reactive_vec/update_filtered");
    const LEN: usize = 256;
    group.throughput(Throughput::Elements(LEN as u64));

    group.bench_function("8_cleared_only", |b| {
        let mut vec: ReactiveVec<usize> = (0..LEN).collect();
        let _subs: Vec<_> = (0..8)
            .map(|_| vec.subscribe(EventKinds::CLEARED, |_| {}))
            .collect();
        b.iter(|| {
            for i in 0..LEN {
                black_box(vec.update_at(i, i + 1));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push, bench_filtered_update);
criterion_main!(benches);
