//! End-to-end qualification of product-day panels.

use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use sift_panel::schema::{MARGIN, PRODUCT_ID};
use sift_panel::{OptionalSignals, PanelError, PanelRecord, records_to_frame};
use sift_rules::columns::{
    PASS_CLEARANCE_SALES, PASS_INVENTORY, PASS_STOCKOUT_RATE, ROLLING_STOCKOUT_RATE,
    SHOULD_FORECAST,
};
use sift_rules::{
    ClearanceGateConfig, ClearanceRule, GatePolicy, PolicyKind, RuleError, StrictGateConfig, criteria_for,
    evaluate, evaluate_by_product,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn record(product: &str, day: i64) -> PanelRecord {
    PanelRecord {
        product_id: Some(product.to_string()),
        date: start() + Duration::days(day),
        sales: Some(10.0),
        launch_date: start() - Duration::days(31),
        margin: Some(0.5),
        inventory: Some(100.0),
        current_price: Some(20.0),
        cost: Some(10.0),
        is_stockout: None,
        markdown_pct: None,
    }
}

fn constant_records(rows: i64) -> Vec<PanelRecord> {
    (0..rows).map(|day| record("p1", day)).collect()
}

fn frame(records: &[PanelRecord], signals: OptionalSignals) -> DataFrame {
    records_to_frame(records, signals, false).unwrap()
}

fn bools(df: &DataFrame, name: &str) -> Vec<Option<bool>> {
    df.column(name).unwrap().bool().unwrap().into_iter().collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().into_iter().collect()
}

#[test]
fn test_strict_constant_panel() {
    let df = frame(&constant_records(50), OptionalSignals::none());
    let out = evaluate(&df, &GatePolicy::default()).unwrap();

    let rates = floats(&out, ROLLING_STOCKOUT_RATE);
    let stockout = bools(&out, PASS_STOCKOUT_RATE);
    let decision = bools(&out, SHOULD_FORECAST);
    for row in 27..50 {
        assert_eq!(rates[row], Some(0.0));
        assert_eq!(stockout[row], Some(true));
        assert_eq!(decision[row], Some(true), "row {row} should qualify");
    }
    assert!(decision[..27].iter().all(|d| *d == Some(false)));
}

#[test]
fn test_clearance_zero_inventory_never_qualifies() {
    let records: Vec<PanelRecord> = constant_records(50)
        .into_iter()
        .map(|r| PanelRecord {
            inventory: Some(0.0),
            markdown_pct: Some(0.5),
            ..r
        })
        .collect();
    let df = frame(&records, OptionalSignals::all());
    let policy = GatePolicy::with_defaults(PolicyKind::InventoryClearanceGate);
    let out = evaluate(&df, &policy).unwrap();

    assert!(bools(&out, PASS_INVENTORY).iter().all(|v| *v == Some(false)));
    assert!(bools(&out, SHOULD_FORECAST).iter().all(|v| *v == Some(false)));
}

#[rstest]
#[case(Some(-5.0), Some(false), ClearanceRule::Required)]
#[case(Some(-5.0), Some(false), ClearanceRule::OverridesAgeRule)]
#[case(None, None, ClearanceRule::Required)]
#[case(None, None, ClearanceRule::OverridesAgeRule)]
fn test_clearance_non_positive_or_unknown_inventory_never_qualifies(
    #[case] inventory: Option<f64>,
    #[case] expected: Option<bool>,
    #[case] rule: ClearanceRule,
) {
    // A new product on deep markdown passes every other criterion.
    let records: Vec<PanelRecord> = constant_records(50)
        .into_iter()
        .map(|r| PanelRecord {
            launch_date: start(),
            inventory,
            markdown_pct: Some(0.5),
            ..r
        })
        .collect();
    let df = frame(&records, OptionalSignals::all());
    let policy = GatePolicy::InventoryClearanceGate(ClearanceGateConfig {
        clearance_rule: rule,
        ..Default::default()
    });
    let out = evaluate(&df, &policy).unwrap();

    assert!(bools(&out, PASS_INVENTORY).iter().all(|v| *v == expected));
    assert!(bools(&out, SHOULD_FORECAST).iter().all(|v| *v == Some(false)));
}

#[test]
fn test_clearance_old_product_on_markdown() {
    let launch = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let records: Vec<PanelRecord> = constant_records(50)
        .into_iter()
        .map(|r| PanelRecord {
            launch_date: launch,
            sales: Some(0.0),
            markdown_pct: Some(0.5),
            ..r
        })
        .collect();
    let df = frame(&records, OptionalSignals::all());
    let policy = GatePolicy::InventoryClearanceGate(ClearanceGateConfig {
        clearance_markdown_pct: 0.3,
        ..Default::default()
    });
    let out = evaluate(&df, &policy).unwrap();

    assert!(bools(&out, PASS_CLEARANCE_SALES).iter().all(|v| *v == Some(true)));
    // Old and not selling: the age rule fails, so clearance alone is not enough.
    assert!(bools(&out, SHOULD_FORECAST).iter().all(|v| *v == Some(false)));
}

#[test]
fn test_empty_panel_keeps_schema() {
    let df = frame(&[], OptionalSignals::none());
    assert_eq!(df.height(), 0);

    for kind in [PolicyKind::StrictGate, PolicyKind::InventoryClearanceGate] {
        let out = evaluate(&df, &GatePolicy::with_defaults(kind)).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(out.column(SHOULD_FORECAST).unwrap().dtype(), &DataType::Boolean);
        for info in criteria_for(kind) {
            assert!(out.column(info.column).is_ok(), "missing {}", info.column);
        }
    }
}

#[test]
fn test_missing_columns_are_all_reported() {
    let df = frame(&constant_records(5), OptionalSignals::none())
        .drop(MARGIN)
        .unwrap()
        .drop("cost")
        .unwrap();
    let err = evaluate(&df, &GatePolicy::default()).unwrap_err();

    assert!(err.is_schema_error());
    let message = err.to_string();
    assert!(message.contains("margin"));
    assert!(message.contains("cost"));
}

#[test]
fn test_non_numeric_measure_is_a_type_error() {
    let mut df = frame(&constant_records(3), OptionalSignals::none());
    df.with_column(Series::new(MARGIN.into(), ["high", "low", "high"]))
        .unwrap();
    let err = evaluate(&df, &GatePolicy::default()).unwrap_err();

    assert!(!err.is_schema_error());
    assert!(matches!(err, RuleError::Panel(PanelError::ColumnType { .. })));
}

#[test]
fn test_evaluation_is_deterministic_and_row_preserving() {
    let mut records = constant_records(40);
    records[10].cost = None;
    records[20].sales = Some(0.0);
    let df = frame(&records, OptionalSignals::none());

    for kind in [PolicyKind::StrictGate, PolicyKind::InventoryClearanceGate] {
        let policy = GatePolicy::with_defaults(kind);
        let first = evaluate(&df, &policy).unwrap();
        let second = evaluate(&df, &policy).unwrap();
        assert_eq!(first.height(), df.height());
        assert!(first.equals_missing(&second));
    }
}

#[test]
fn test_decision_is_fail_closed() {
    let mut rng = StdRng::seed_from_u64(7);
    let records: Vec<PanelRecord> = constant_records(60)
        .into_iter()
        .map(|r| PanelRecord {
            sales: rng.gen_bool(0.8).then(|| rng.gen_range(0.0..5.0_f64).floor()),
            margin: Some(rng.gen_range(-0.1..0.4)),
            cost: rng.gen_bool(0.97).then_some(10.0),
            is_stockout: Some(if rng.gen_bool(0.1) { 1.0 } else { 0.0 }),
            markdown_pct: Some(rng.gen_range(0.0..0.6)),
            ..r
        })
        .collect();
    let df = frame(&records, OptionalSignals::all());

    for kind in [PolicyKind::StrictGate, PolicyKind::InventoryClearanceGate] {
        let out = evaluate(&df, &GatePolicy::with_defaults(kind)).unwrap();
        let decision = bools(&out, SHOULD_FORECAST);
        let criteria: Vec<Vec<Option<bool>>> = criteria_for(kind)
            .iter()
            .map(|info| bools(&out, info.column))
            .collect();

        for (row, decided) in decision.iter().enumerate() {
            let all_known_pass = criteria.iter().all(|c| c[row] == Some(true));
            assert_eq!(*decided, Some(all_known_pass), "{kind} row {row}");
        }
    }
}

#[test]
fn test_raising_min_sales_days_never_adds_rows() {
    let mut rng = StdRng::seed_from_u64(42);
    let records: Vec<PanelRecord> = constant_records(90)
        .into_iter()
        .map(|r| PanelRecord {
            sales: Some(if rng.gen_bool(0.6) { 3.0 } else { 0.0 }),
            ..r
        })
        .collect();
    let df = frame(&records, OptionalSignals::none());

    let mut previous: Option<Vec<Option<bool>>> = None;
    for min_days in 0..=14 {
        let policy = GatePolicy::StrictGate(StrictGateConfig {
            min_recent_sales_days: min_days,
            ..Default::default()
        });
        let decision = bools(&evaluate(&df, &policy).unwrap(), SHOULD_FORECAST);
        if let Some(prev) = &previous {
            for (row, (before, after)) in prev.iter().zip(&decision).enumerate() {
                assert!(
                    !(*before == Some(false) && *after == Some(true)),
                    "row {row} started passing at min_recent_sales_days={min_days}"
                );
            }
        }
        previous = Some(decision);
    }
}

#[rstest]
#[case(ClearanceRule::Required)]
#[case(ClearanceRule::OverridesAgeRule)]
fn test_raising_min_sales_days_never_adds_clearance_rows(#[case] rule: ClearanceRule) {
    // Old products: the age rule rests on sales recency alone.
    let launch = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let records: Vec<PanelRecord> = constant_records(90)
        .into_iter()
        .map(|r| PanelRecord {
            launch_date: launch,
            sales: Some(if rng.gen_bool(0.6) { 3.0 } else { 0.0 }),
            markdown_pct: Some(if rng.gen_bool(0.5) { 0.4 } else { 0.0 }),
            ..r
        })
        .collect();
    let df = frame(&records, OptionalSignals::all());

    let mut previous: Option<Vec<Option<bool>>> = None;
    let mut qualified_at_zero = 0;
    for min_days in 0..=14 {
        let policy = GatePolicy::InventoryClearanceGate(ClearanceGateConfig {
            min_recent_sales_days: min_days,
            clearance_rule: rule,
            ..Default::default()
        });
        let decision = bools(&evaluate(&df, &policy).unwrap(), SHOULD_FORECAST);
        if min_days == 0 {
            qualified_at_zero = decision.iter().filter(|d| **d == Some(true)).count();
        }
        if let Some(prev) = &previous {
            for (row, (before, after)) in prev.iter().zip(&decision).enumerate() {
                assert!(
                    !(*before == Some(false) && *after == Some(true)),
                    "row {row} started passing at min_recent_sales_days={min_days}"
                );
            }
        }
        previous = Some(decision);
    }
    assert!(qualified_at_zero > 0);
}

#[test]
fn test_products_do_not_share_windows() {
    // Interleave a long-running product with a short one.
    let mut records: Vec<PanelRecord> = Vec::new();
    for day in 0..40 {
        records.push(record("long", day));
        if day >= 30 {
            records.push(record("short", day));
        }
    }
    let df = records_to_frame(&records, OptionalSignals::none(), true).unwrap();
    let out = evaluate_by_product(&df, PRODUCT_ID, &GatePolicy::default()).unwrap();
    assert_eq!(out.height(), df.height());

    let products: Vec<Option<&str>> = out.column(PRODUCT_ID).unwrap().str().unwrap().into_iter().collect();
    let decision = bools(&out, SHOULD_FORECAST);
    // First-appearance order: all "long" rows, then all "short" rows.
    assert!(products[..40].iter().all(|p| *p == Some("long")));
    assert!(products[40..].iter().all(|p| *p == Some("short")));
    assert_eq!(decision[39], Some(true));
    assert!(decision[40..].iter().all(|d| *d == Some(false)));

    let long_only: Vec<PanelRecord> = (0..40).map(|day| record("long", day)).collect();
    let alone = evaluate(&frame(&long_only, OptionalSignals::none()), &GatePolicy::default()).unwrap();
    assert_eq!(decision[..40], bools(&alone, SHOULD_FORECAST)[..]);
}
