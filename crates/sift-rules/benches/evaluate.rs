//! Benchmarks for panel qualification.

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sift_panel::schema::PRODUCT_ID;
use sift_panel::{OptionalSignals, PanelRecord, records_to_frame};
use sift_rules::{GatePolicy, PolicyKind, evaluate, evaluate_by_product};

fn synthetic_panel(products: usize, days: i64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(11);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut records = Vec::with_capacity(products * days as usize);
    for product in 0..products {
        let launch = start - Duration::days(rng.gen_range(0..240));
        for day in 0..days {
            records.push(PanelRecord {
                product_id: Some(format!("sku-{product:04}")),
                date: start + Duration::days(day),
                sales: rng.gen_bool(0.98).then(|| rng.gen_range(0.0..20.0_f64).floor()),
                launch_date: launch,
                margin: Some(rng.gen_range(-0.1..0.5)),
                inventory: Some(rng.gen_range(0.0..200.0_f64).floor()),
                current_price: Some(19.99),
                cost: Some(9.5),
                is_stockout: Some(if rng.gen_bool(0.05) { 1.0 } else { 0.0 }),
                markdown_pct: Some(if rng.gen_bool(0.2) { 0.4 } else { 0.0 }),
            });
        }
    }
    records_to_frame(&records, OptionalSignals::all(), true).unwrap()
}

fn bench_single_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_product");
    for days in [90_i64, 365, 1_460] {
        let panel = synthetic_panel(1, days).drop(PRODUCT_ID).unwrap();
        for kind in [PolicyKind::StrictGate, PolicyKind::InventoryClearanceGate] {
            let policy = GatePolicy::with_defaults(kind);
            group.bench_with_input(
                BenchmarkId::new(kind.to_string(), days),
                &panel,
                |b, panel| b.iter(|| evaluate(black_box(panel), &policy)),
            );
        }
    }
    group.finish();
}

fn bench_by_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("by_product");
    group.sample_size(20);
    for products in [10_usize, 100, 500] {
        let panel = synthetic_panel(products, 180);
        let policy = GatePolicy::default();
        group.bench_with_input(BenchmarkId::from_parameter(products), &panel, |b, panel| {
            b.iter(|| evaluate_by_product(black_box(panel), PRODUCT_ID, &policy))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_product, bench_by_product);
criterion_main!(benches);
