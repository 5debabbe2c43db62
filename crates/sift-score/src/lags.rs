//! Lagged sales features.

use polars::prelude::*;
use sift_panel::schema::SALES;

use crate::error::{Result, ScoreError};

/// Name of the `k`-row sales lag column.
pub fn lag_column(lag: usize) -> String {
    format!("sales_lag_{lag}")
}

/// Append `sales_lag_k` for every `k` in `lags`.
///
/// Row i of `sales_lag_k` holds `sales` from row `i - k`; the first `k` rows
/// are null. Rows must belong to a single product and be sorted by date.
///
/// # Errors
/// [`ScoreError::InvalidWindow`] for a zero lag, [`ScoreError::MissingColumn`]
/// when `sales` is absent.
pub fn add_lag_features(df: &DataFrame, lags: &[usize]) -> Result<DataFrame> {
    if lags.contains(&0) {
        return Err(ScoreError::InvalidWindow("lag must be at least 1".to_string()));
    }
    if df.column(SALES).is_err() {
        return Err(ScoreError::MissingColumn(SALES.to_string()));
    }

    let features: Vec<Expr> = lags
        .iter()
        .map(|&lag| col(SALES).shift(lit(lag as i64)).alias(lag_column(lag)))
        .collect();
    Ok(df.clone().lazy().with_columns(features).collect()?)
}
