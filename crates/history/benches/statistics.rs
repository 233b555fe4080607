//! Benchmarks for history aggregation
//!
//! Run with: cargo bench --package history

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use history::{ExportFormat, HistoryEntry, HistoryStore, Statistics};

fn build_history(size: u64) -> Vec<HistoryEntry> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();
    (0..size)
        .map(|i| {
            let year = if i % 13 == 0 {
                "Unknown".to_string()
            } else {
                (1955 + i % 65).to_string()
            };
            HistoryEntry::new(
                i % 400,
                format!("Artist {}", i % 150),
                format!("Album {i}"),
                year,
                start + chrono::Duration::hours(i as i64),
            )
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let entries = build_history(5_000);

    c.bench_function("statistics_from_entries", |b| {
        b.iter(|| {
            let stats = Statistics::from_entries(black_box(&entries));
            black_box(stats)
        })
    });
}

fn bench_store_round_trip(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("Failed to create scratch dir");
    let store = HistoryStore::new(dir.path().join("history.json"));
    for entry in build_history(1_000) {
        store.append(entry).expect("Failed to seed history");
    }

    c.bench_function("store_aggregate_1000", |b| {
        b.iter(|| {
            let stats = store.aggregate().unwrap();
            black_box(stats)
        })
    });
}

fn bench_export_markdown(c: &mut Criterion) {
    let entries = build_history(1_000);

    c.bench_function("export_markdown", |b| {
        b.iter(|| black_box(ExportFormat::Markdown.render(black_box(&entries))))
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_store_round_trip,
    bench_export_markdown
);
criterion_main!(benches);
