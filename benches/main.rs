//! Benchmarks comparing the ranked skiplist to a `BTreeSet` baseline.

use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    skiplist::insert,
    skiplist::rank,
    skiplist::by_rank,
    skiplist::by_key,
    skiplist::iter,
    shared::insert,
    btreeset::insert,
    btreeset::rank,
    btreeset::by_rank,
);
criterion_main!(benches);
