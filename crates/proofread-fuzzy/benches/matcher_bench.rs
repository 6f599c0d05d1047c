//! Benchmarks for proofread fuzzy matching
//!
//! Measures performance of:
//! - Single key scoring across the score bands
//! - Catalog-sized searches (courses and tutorials)
//! - Branch suggestion with language boosting

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use proofread_fuzzy::{score_key, search, suggest, BranchSuggestOptions, DEFAULT_MIN_SCORE};

fn tutorial_paths(count: usize) -> Vec<String> {
    let categories = ["wallet", "node", "mining", "privacy", "exchange", "merchant"];
    (0..count)
        .map(|i| format!("{}/tool-{}-guide", categories[i % categories.len()], i))
        .collect()
}

/// Benchmark scoring of a single key in every band
fn bench_score_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_key");
    let cases = [
        ("exact", "btc101", "btc101"),
        ("prefix", "btc", "btc101"),
        ("boundary", "alby", "wallet/alby"),
        ("fuzzy", "bitcon", "intro-to-bitcoin-and-lightning"),
    ];

    for (name, query, key) in cases {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &(query, key), |b, &(q, k)| {
            b.iter(|| score_key(black_box(q), black_box(k)))
        });
    }
    group.finish();
}

/// Benchmark searches over catalogs of increasing size
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for &size in &[50usize, 500, 5_000] {
        let paths = tutorial_paths(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("tutorials", size), &paths, |b, paths| {
            b.iter(|| search(black_box("wallet gide"), paths, |p| [p.as_str()], 10, DEFAULT_MIN_SCORE))
        });
    }
    group.finish();
}

/// Benchmark branch suggestion
fn bench_suggest(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggest");
    let branches: Vec<String> = (0..300)
        .map(|i| match i % 3 {
            0 => format!("es-review-{i}"),
            1 => format!("feature/{i}"),
            _ => format!("fix-{i}"),
        })
        .collect();

    group.bench_function("browse_with_language", |b| {
        b.iter(|| suggest(black_box(""), Some("es"), &branches, BranchSuggestOptions::default()))
    });
    group.bench_function("query_with_language", |b| {
        b.iter(|| suggest(black_box("review"), Some("es"), &branches, BranchSuggestOptions::default()))
    });
    group.finish();
}

criterion_group!(benches, bench_score_key, bench_search, bench_suggest);
criterion_main!(benches);
