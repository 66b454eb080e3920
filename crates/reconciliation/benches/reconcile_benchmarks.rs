use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use shrinkwatch_inventory::{Product, ScanEvent, ScanStatus};
use shrinkwatch_reconciliation::{OccurrenceMode, reconcile_at, summarize};

fn snapshot(products: usize, scans_per_product: usize) -> (Vec<Product>, Vec<ScanEvent>) {
    let at = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();

    let products: Vec<Product> = (0..products)
        .map(|i| {
            let total = 1_000 + (i as u64 % 97);
            Product::new(format!("prod{i}"), "inv1", format!("Item {i}"))
                .with_counts(total, i as u64 % 500, total - (i as u64 % 500) - (i as u64 % 7))
                .with_price(Decimal::new(199 + i as i64 % 1_000, 2))
        })
        .collect();

    let scans: Vec<ScanEvent> = products
        .iter()
        .flat_map(|p| {
            (0..scans_per_product).map(move |k| {
                let status = if k % 3 == 0 { ScanStatus::Sold } else { ScanStatus::Unsold };
                ScanEvent::new(p.id.clone(), p.name.clone(), at, status, "inv1")
            })
        })
        .collect();

    (products, scans)
}

fn bench_reconcile(c: &mut Criterion) {
    let detected_at = Utc.with_ymd_and_hms(2025, 3, 6, 0, 0, 0).unwrap();
    let mut group = c.benchmark_group("reconcile");

    for size in [100usize, 1_000, 10_000] {
        let (products, scans) = snapshot(size, 4);
        group.throughput(Throughput::Elements(scans.len() as u64));
        group.bench_with_input(BenchmarkId::new("per_scan", size), &size, |b, _| {
            b.iter(|| reconcile_at(black_box(&products), black_box(&scans), detected_at, OccurrenceMode::PerScan))
        });
        group.bench_with_input(BenchmarkId::new("per_product", size), &size, |b, _| {
            b.iter(|| reconcile_at(black_box(&products), black_box(&scans), detected_at, OccurrenceMode::PerProduct))
        });
    }

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for size in [100usize, 1_000, 10_000] {
        let (products, _) = snapshot(size, 0);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| summarize(black_box(&products)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_summarize);
criterion_main!(benches);
