use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use race_locks::{AnyLock, LockKind, RawLock};
use strum::IntoEnumIterator;

// the fast path only: one thread, lock never contended
fn uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    for kind in LockKind::iter() {
        let lock = AnyLock::new(kind);
        group.bench_function(kind.to_string(), |b| {
            b.iter(|| {
                lock.acquire(black_box(0));
                lock.release(0);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, uncontended);
criterion_main!(benches);
