//! Microbenchmarks for the `resolve()` full-recompute pass.
//!
//! The pass is O(N·K) over N series and K attribute keys per batch, by
//! contract. These benches size N and K to show where that spend goes.
//!
//! Run with: `cargo bench -p tapestry -- resolve`

#![allow(missing_docs, clippy::cast_precision_loss)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tapestry::{Batch, Dataset, SeriesUpdate, apply, resolve};

/// Builds a dataset of `series_count` series, each carrying `key_count`
/// attributes (one distinguishing) and a shared tag plus a unique one.
fn setup_dataset(series_count: usize, key_count: usize) -> Dataset {
    let mut dataset = Dataset::new();
    let mut batch = Batch::new();

    for i in 0..series_count {
        let mut attributes: std::collections::BTreeMap<String, String> = (0..key_count)
            .map(|k| (format!("key_{k}"), "shared".to_string()))
            .collect();
        attributes.insert("instance".to_string(), format!("{i}"));

        batch.push(SeriesUpdate {
            id: format!("metric_{i}"),
            time_ms: 1_700_000_000_000,
            value: i as f64,
            tags: ["region:us".to_string(), format!("host:h{i}")]
                .into_iter()
                .collect(),
            attributes,
        });
    }

    apply(&mut dataset, &batch);
    dataset
}

fn bench_resolve_series_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/series_count");

    for count in [1, 10, 100, 1_000] {
        let mut dataset = setup_dataset(count, 8);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                resolve(black_box(&mut dataset));
            });
        });
    }

    group.finish();
}

fn bench_resolve_key_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/attribute_keys");

    for keys in [1, 8, 32, 128] {
        let mut dataset = setup_dataset(100, keys);

        group.bench_with_input(BenchmarkId::from_parameter(keys), &keys, |b, _| {
            b.iter(|| {
                resolve(black_box(&mut dataset));
            });
        });
    }

    group.finish();
}

fn bench_batch_then_resolve(c: &mut Criterion) {
    // The per-envelope cost as the handler sees it: one-series batch applied
    // to an already-populated dataset, followed by the full recompute.
    let mut dataset = setup_dataset(100, 8);
    let mut time_ms = 1_700_000_000_000i64;

    c.bench_function("on_batch/100_series_steady_state", |b| {
        b.iter(|| {
            time_ms += 1_000;
            let batch = Batch::from(vec![SeriesUpdate {
                id: "metric_0".to_string(),
                time_ms,
                value: 42.5,
                tags: Default::default(),
                attributes: Default::default(),
            }]);
            tapestry::on_batch(black_box(&mut dataset), black_box(&batch));
        });
    });
}

criterion_group!(
    benches,
    bench_resolve_series_count,
    bench_resolve_key_count,
    bench_batch_then_resolve,
);
criterion_main!(benches);
