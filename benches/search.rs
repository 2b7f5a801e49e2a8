use climogram::{SearchIndex, SearchPolicy, Station, StationCatalog};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeSet;

const UFS: [&str; 6] = ["AM", "BA", "DF", "GO", "RS", "SP"];
const NAMES: [&str; 5] = ["São Gabriel", "Ribeirão", "Brasília", "Itaituba", "Porto"];

fn synthetic_catalog(size: usize) -> StationCatalog {
    let stations = (0..size)
        .map(|i| Station {
            id: format!("A{:03}", i),
            name: format!("{} {}", NAMES[i % NAMES.len()], i),
            uf: UFS[i % UFS.len()].to_string(),
            lat: Some(-30.0 + (i % 250) as f64 * 0.1),
            lon: Some(-70.0 + (i % 300) as f64 * 0.1),
            alt: None,
            years: BTreeSet::from([2022, 2023, 2024]),
        })
        .collect();
    StationCatalog::from_stations(stations)
}

fn bench_search(c: &mut Criterion) {
    let catalog = synthetic_catalog(600);
    let exact = SearchIndex::new(catalog.stations().iter().cloned(), SearchPolicy::default());
    let folded = SearchIndex::new(
        catalog.stations().iter().cloned(),
        SearchPolicy {
            fold_diacritics: true,
            ..SearchPolicy::default()
        },
    );

    c.bench_function("search_exact", |b| b.iter(|| exact.apply(black_box("ribeirão"))));
    c.bench_function("search_folded", |b| b.iter(|| folded.apply(black_box("sao gabriel"))));
    c.bench_function("show_all", |b| b.iter(|| exact.show_all()));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
