//! Baseline evaluation on qualified rows.
//!
//! Qualified rows are forecast in date order, the leading span is held as
//! training history and the trailing span is scored with WMAPE.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sift_panel::{concat_products, partition_by_product};
use tracing::{debug, info};

use crate::baseline::Forecaster;
use crate::error::Result;
use crate::split::{qualified_rows, split_train_test};
use crate::wmape::{WmapeVariant, wmape};

/// Configuration for a backtest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Leading qualified rows per product held out of scoring (default: 60)
    pub train_days: usize,
    /// Rows entering the error (default: positive sales only)
    pub variant: WmapeVariant,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            train_days: 60,
            variant: WmapeVariant::PositiveSalesOnly,
        }
    }
}

/// Outcome of a backtest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestScore {
    /// Forecaster name
    pub forecaster: String,
    /// WMAPE variant used
    pub variant: WmapeVariant,
    /// Products scored
    pub products: usize,
    /// Products with no more qualified rows than `train_days`
    pub skipped_products: usize,
    /// Qualified rows in training spans
    pub train_rows: usize,
    /// Qualified rows in test spans
    pub test_rows: usize,
    /// Error over the test spans, `None` when nothing could be scored
    pub wmape: Option<f64>,
}

/// Backtest a single-product qualified panel.
pub fn backtest<F: Forecaster + ?Sized>(
    panel: &DataFrame,
    forecaster: &F,
    config: &BacktestConfig,
) -> Result<BacktestScore> {
    match forecast_shard(panel, forecaster, config)? {
        (train_rows, Some(test)) => score(forecaster, config, 1, 0, train_rows, &test),
        (train_rows, None) => score(forecaster, config, 0, 1, train_rows, &DataFrame::empty()),
    }
}

/// Backtest a multi-product qualified panel, pooling every product's test
/// span into one error.
pub fn backtest_by_product<F: Forecaster + ?Sized>(
    panel: &DataFrame,
    product_column: &str,
    forecaster: &F,
    config: &BacktestConfig,
) -> Result<BacktestScore> {
    let shards = partition_by_product(panel, product_column)?;

    let mut tests = Vec::with_capacity(shards.len());
    let mut train_rows = 0;
    let mut skipped = 0;
    for shard in &shards {
        let (train, test) = forecast_shard(shard, forecaster, config)?;
        train_rows += train;
        match test {
            Some(test) => tests.push(test),
            None => skipped += 1,
        }
    }
    let products = tests.len();
    let test = concat_products(tests)?;
    score(forecaster, config, products, skipped, train_rows, &test)
}

/// Forecast one product's qualified rows and cut off the test span.
///
/// Returns the training row count and the test span, which is `None` when the
/// product has no rows beyond the training span.
fn forecast_shard<F: Forecaster + ?Sized>(
    shard: &DataFrame,
    forecaster: &F,
    config: &BacktestConfig,
) -> Result<(usize, Option<DataFrame>)> {
    let qualified = qualified_rows(shard)?;
    if qualified.height() <= config.train_days {
        debug!(
            qualified = qualified.height(),
            train_days = config.train_days,
            "too few qualified rows to score"
        );
        return Ok((qualified.height(), None));
    }
    let forecast = forecaster.forecast_frame(&qualified)?;
    let (train, test) = split_train_test(&forecast, config.train_days)?;
    Ok((train.height(), Some(test)))
}

fn score<F: Forecaster + ?Sized>(
    forecaster: &F,
    config: &BacktestConfig,
    products: usize,
    skipped_products: usize,
    train_rows: usize,
    test: &DataFrame,
) -> Result<BacktestScore> {
    let error = if test.height() == 0 {
        None
    } else {
        wmape(test, config.variant)?
    };
    info!(
        forecaster = forecaster.name(),
        variant = %config.variant,
        products,
        test_rows = test.height(),
        wmape = ?error,
        "backtest finished"
    );
    Ok(BacktestScore {
        forecaster: forecaster.name().to_string(),
        variant: config.variant,
        products,
        skipped_products,
        train_rows,
        test_rows: test.height(),
        wmape: error,
    })
}
