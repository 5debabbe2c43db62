//! Weighted mean absolute percentage error.
//!
//! `WMAPE = Σ|actual - forecast| / Σ actual` over the scored rows. Rows where
//! either the actual or the forecast is null are never scored.

use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sift_panel::schema::SALES;

use crate::baseline::FORECAST;
use crate::error::{Result, ScoreError};

/// Which rows enter the error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum WmapeVariant {
    /// Only rows with `sales > 0`
    #[default]
    #[display("positive_sales_only")]
    PositiveSalesOnly,
    /// Every row, zero-sales days included
    #[display("all_rows")]
    AllRows,
}

/// WMAPE of the `forecast` column against `sales`.
///
/// # Returns
/// `None` when no row is scored or the actuals sum to zero or less.
pub fn wmape(df: &DataFrame, variant: WmapeVariant) -> Result<Option<f64>> {
    let actual = float_column(df, SALES)?;
    let forecast = float_column(df, FORECAST)?;

    let (error, volume) = actual
        .into_iter()
        .zip(&forecast)
        .filter_map(|(a, f)| Some((a?, f?)))
        .filter(|(a, _)| match variant {
            WmapeVariant::PositiveSalesOnly => *a > 0.0,
            WmapeVariant::AllRows => true,
        })
        .fold((0.0, 0.0), |(error, volume), (a, f)| {
            (error + (a - f).abs(), volume + a)
        });

    Ok((volume > 0.0).then(|| error / volume))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .map_err(|_| ScoreError::MissingColumn(name.to_string()))?;
    Ok(column.cast(&DataType::Float64)?.f64()?.clone())
}
