//! Row selection for the model stage.

use polars::prelude::*;
use sift_panel::schema::SALES;
use sift_rules::columns::SHOULD_FORECAST;
use tracing::debug;

use crate::error::{Result, ScoreError};

/// Keep only rows with `should_forecast = true`.
///
/// Input order is preserved.
pub fn qualified_rows(df: &DataFrame) -> Result<DataFrame> {
    let decision = df
        .column(SHOULD_FORECAST)
        .map_err(|_| ScoreError::MissingColumn(SHOULD_FORECAST.to_string()))?;
    let qualified = df.filter(decision.bool()?)?;
    debug!(rows = df.height(), qualified = qualified.height(), "filtered to qualified rows");
    Ok(qualified)
}

/// Split into the first `train_days` rows and the rest.
///
/// # Errors
/// [`ScoreError::InvalidSplit`] when `train_days` exceeds the row count.
pub fn split_train_test(df: &DataFrame, train_days: usize) -> Result<(DataFrame, DataFrame)> {
    let rows = df.height();
    if train_days > rows {
        return Err(ScoreError::InvalidSplit { train_days, rows });
    }
    let train = df.slice(0, train_days);
    let test = df.slice(train_days as i64, rows - train_days);
    Ok((train, test))
}

/// Keep rows where `sales` and every feature column are non-null.
///
/// Lag features are null for the first rows of a series; those rows cannot be
/// used for training.
pub fn complete_feature_rows<S: AsRef<str>>(df: &DataFrame, features: &[S]) -> Result<DataFrame> {
    let mut mask = BooleanChunked::full(PlSmallStr::from_static("complete"), true, df.height());
    for name in std::iter::once(SALES).chain(features.iter().map(|f| f.as_ref())) {
        let column = df
            .column(name)
            .map_err(|_| ScoreError::MissingColumn(name.to_string()))?;
        mask = &mask & &column.as_materialized_series().is_not_null();
    }
    Ok(df.filter(&mask)?)
}
