use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pokedex::{InMemoryPokemonStore, Pokemon, PokemonCatalog, PokemonId, PokemonStore};

fn make_catalog(size: u32) -> (PokemonCatalog, PokemonId) {
    let store = InMemoryPokemonStore::new();
    let batch: Vec<Pokemon> = (1..=size)
        .map(|no| Pokemon::new(no, format!("pokemon-{no}")))
        .collect();
    let middle = batch[batch.len() / 2].id;
    store.insert_many(batch).unwrap();
    (PokemonCatalog::new(Arc::new(store)), middle)
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(1));

    for size in [10u32, 650] {
        let (catalog, middle) = make_catalog(size);
        let mid = size / 2;
        let by_no = mid.to_string();
        let by_id = middle.to_string();
        let by_name = format!("  POKEMON-{mid} ");

        group.bench_with_input(BenchmarkId::new("no", size), &by_no, |b, term| {
            b.iter(|| catalog.find_one(term).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("storage_id", size), &by_id, |b, term| {
            b.iter(|| catalog.find_one(term).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("name", size), &by_name, |b, term| {
            b.iter(|| catalog.find_one(term).unwrap());
        });
        // Worst case: every reading is tried and misses.
        group.bench_with_input(BenchmarkId::new("miss", size), "999999", |b, term| {
            b.iter(|| catalog.find_one(term).unwrap_err());
        });
    }

    group.finish();
}

criterion_group!(resolve, bench_resolve);
criterion_main!(resolve);
