//! Suggestion ranking and series naming benchmarks.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use promdash::catalog::MetricCatalog;
use promdash::normalize::ResponseNormalizer;
use promdash::series::SeriesNamer;
use promdash::suggest::SuggestionRanker;
use serde_json::json;

/// Builtin catalog grown to the discovery ceiling.
fn full_catalog() -> MetricCatalog {
    let catalog = MetricCatalog::default();
    let discovered: Vec<String> = (0..100).map(|i| format!("exporter_metric_{i:03}_total")).collect();
    let _ = catalog.merge(&discovered);
    catalog
}

fn bench_rank(c: &mut Criterion) {
    let catalog = full_catalog();
    let ranker = SuggestionRanker::default();
    let mut group = c.benchmark_group("rank");

    for input in ["s", "go_mem", "process_resident_memory_bytes", "zzz"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| ranker.suggest(black_box(input), &catalog));
        });
    }
    group.finish();
}

fn bench_chart_series(c: &mut Criterion) {
    let values: Vec<_> = (0..240).map(|i| json!([1_700_000_000 + i * 15, "12.5"])).collect();
    let result: Vec<_> = (0..20)
        .map(|i| json!({"metric": {"__name__": "mppt_values", "sensor": format!("sensor {i}")}, "values": values}))
        .collect();
    let payload = json!({"status": "success", "data": {"resultType": "matrix", "result": result}});

    c.bench_function("chart_series_20x240", |b| {
        b.iter(|| SeriesNamer::chart_series(&ResponseNormalizer::extract_results(black_box(&payload))));
    });
}

criterion_group!(benches, bench_rank, bench_chart_series);
criterion_main!(benches);
