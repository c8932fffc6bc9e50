//! Benchmarks for the filter → sort → paginate pipeline.
//!
//! Run with: cargo bench --bench pipeline_benchmark

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use parts_quote::catalog::{build_page, filtered_sorted};
use parts_quote::{Product, ProductId, SortDirection, SortField, SortOrder, ViewState};
use std::hint::black_box;

const MODELS: [&str; 6] = ["iPhone 12", "iPhone 13", "Galaxy S21", "Galaxy A52", "Pixel 6", "Redmi 9"];
const PARTS: [&str; 5] = ["Display", "Akku", "Backcover", "Kamera", "Ladebuchse"];

/// Generate a catalog of `count` products with mixed id forms.
fn generate_catalog(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| {
            let id = if i % 7 == 0 {
                ProductId::Text(format!("SUP-{i:05}"))
            } else {
                ProductId::Number(i64::try_from(i).unwrap_or(i64::MAX))
            };
            let name = format!("{} {} #{}", MODELS[i % MODELS.len()], PARTS[i % PARTS.len()], i % 97);
            Product::new(id, name)
        })
        .collect()
}

fn bench_build_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_page");

    for size in [1_000, 10_000] {
        let catalog = generate_catalog(size);
        let unfiltered = ViewState::default().with_page(3);
        let filtered = ViewState::new(SortOrder::new(SortField::Id, SortDirection::Descending))
            .with_name_filter("akku");

        group.bench_with_input(BenchmarkId::new("unfiltered", size), &catalog, |b, catalog| {
            b.iter(|| build_page(black_box(catalog), black_box(&unfiltered), 10));
        });
        group.bench_with_input(BenchmarkId::new("name_filter", size), &catalog, |b, catalog| {
            b.iter(|| build_page(black_box(catalog), black_box(&filtered), 10));
        });
    }

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let catalog = generate_catalog(10_000);
    let by_name = ViewState::default();
    let by_id = ViewState::new(SortOrder::new(SortField::Id, SortDirection::Ascending));

    c.bench_function("sort_by_name_10k", |b| {
        b.iter(|| filtered_sorted(black_box(&catalog), black_box(&by_name)));
    });
    c.bench_function("sort_by_id_10k", |b| {
        b.iter(|| filtered_sorted(black_box(&catalog), black_box(&by_id)));
    });
}

criterion_group!(benches, bench_build_page, bench_sort);
criterion_main!(benches);
