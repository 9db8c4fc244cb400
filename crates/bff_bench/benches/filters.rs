use bff_bench::synthetic_docs;
use bff_core::{AcceptAll, BloomFilter, FilterOptions, ShardedIndex};
use criterion::{criterion_group, criterion_main, Criterion, black_box};

fn bench_filter(c: &mut Criterion) {
    let bloom = BloomFilter::new(1024, FilterOptions::new().with_mappers(4));
    bloom.preallocate(16);
    let mut data = bloom.acquire();
    bloom.add(&mut data, b"hello");
    c.bench_function("add", |b| b.iter(|| bloom.add(&mut data, black_box(b"golang"))));
    c.bench_function("may_contain", |b| b.iter(|| black_box(bloom.may_contain(&data, b"hello"))));
    c.bench_function("acquire_release", |b| b.iter(|| black_box(bloom.acquire().is_zero())));
}

fn bench_lookup(c: &mut Criterion) {
    let docs = synthetic_docs(100_000, 4, 5_000, 7);
    let idx = ShardedIndex::new(8, AcceptAll, FilterOptions::new().with_mappers(2));
    for (id, terms) in &docs {
        idx.add(*id, terms);
    }
    let query = vec![b"w17".to_vec(), b"w42".to_vec()];
    c.bench_function("lookup_100k", |b| b.iter(|| black_box(idx.lookup(&query).ids.len())));
}

criterion_group!(benches, bench_filter, bench_lookup);
criterion_main!(benches);
