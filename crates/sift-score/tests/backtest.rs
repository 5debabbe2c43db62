//! Qualification feeding the baseline stage.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use polars::prelude::DataFrame;
use sift_panel::schema::PRODUCT_ID;
use sift_panel::{OptionalSignals, PanelRecord, records_to_frame};
use sift_rules::{GatePolicy, evaluate, evaluate_by_product};
use sift_score::{
    BacktestConfig, MovingAverageForecaster, WmapeVariant, add_lag_features, backtest,
    backtest_by_product, complete_feature_rows, lag_column, qualified_rows, split_train_test,
};

fn records(product: &str, days: i64, sales: impl Fn(i64) -> f64) -> Vec<PanelRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    (0..days)
        .map(|day| PanelRecord {
            product_id: Some(product.to_string()),
            date: start + Duration::days(day),
            sales: Some(sales(day)),
            launch_date: start - Duration::days(10),
            margin: Some(0.3),
            inventory: Some(50.0),
            current_price: Some(12.0),
            cost: Some(8.0),
            is_stockout: None,
            markdown_pct: None,
        })
        .collect()
}

fn qualified_panel(days: i64, sales: impl Fn(i64) -> f64) -> DataFrame {
    let df = records_to_frame(&records("p1", days, sales), OptionalSignals::none(), false).unwrap();
    evaluate(&df, &GatePolicy::default()).unwrap()
}

#[test]
fn test_constant_sales_backtest_is_exact() {
    let panel = qualified_panel(120, |_| 10.0);
    let score = backtest(&panel, &MovingAverageForecaster::default(), &BacktestConfig::default()).unwrap();

    // Rows 27..120 qualify; the first 60 of them are training history.
    assert_eq!(score.train_rows, 60);
    assert_eq!(score.test_rows, 33);
    assert_eq!(score.products, 1);
    assert_relative_eq!(score.wmape.unwrap(), 0.0);
}

#[test]
fn test_alternating_sales_variants() {
    // 0, 20, 0, 20, ... keeps recency at exactly 7 of 14 days.
    let panel = qualified_panel(149, |day| if day % 2 == 0 { 0.0 } else { 20.0 });
    let forecaster = MovingAverageForecaster::default();

    let positive = backtest(&panel, &forecaster, &BacktestConfig::default()).unwrap();
    let all_rows = backtest(
        &panel,
        &forecaster,
        &BacktestConfig {
            variant: WmapeVariant::AllRows,
            ..Default::default()
        },
    )
    .unwrap();

    // The 28-row mean is always 10, off by 10 on each of 62 test rows.
    assert_relative_eq!(positive.wmape.unwrap(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(all_rows.wmape.unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_short_products_are_skipped() {
    let mut all = records("long", 120, |_| 10.0);
    all.extend(records("short", 40, |_| 10.0));
    let df = records_to_frame(&all, OptionalSignals::none(), true).unwrap();
    let panel = evaluate_by_product(&df, PRODUCT_ID, &GatePolicy::default()).unwrap();

    let score = backtest_by_product(
        &panel,
        PRODUCT_ID,
        &MovingAverageForecaster::default(),
        &BacktestConfig::default(),
    )
    .unwrap();
    assert_eq!(score.products, 1);
    assert_eq!(score.skipped_products, 1);
    assert_eq!(score.train_rows, 60 + 13);
    assert_eq!(score.test_rows, 33);
}

#[test]
fn test_lag_features_on_training_span() {
    let panel = qualified_panel(80, |day| (day % 5) as f64 + 1.0);
    let qualified = qualified_rows(&panel).unwrap();
    let featured = add_lag_features(&qualified, &[1, 7]).unwrap();
    let (train, test) = split_train_test(&featured, 30).unwrap();

    let features = [lag_column(1), lag_column(7)];
    let ready = complete_feature_rows(&train, &features).unwrap();
    assert_eq!(ready.height(), 30 - 7);
    assert_eq!(test.height(), qualified.height() - 30);
}
