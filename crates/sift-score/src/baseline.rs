//! Baseline forecasts.
//!
//! A [`Forecaster`] appends a `forecast` column to a single-product frame
//! sorted by date. The moving average is the reference every model has to
//! beat.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sift_panel::schema::SALES;

use crate::error::{Result, ScoreError};

/// Output column of every forecaster.
pub const FORECAST: &str = "forecast";

/// Produces a `forecast` column for a frame.
pub trait Forecaster {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Columns the forecaster reads.
    fn required_columns(&self) -> &[&str];

    /// Append the `forecast` column.
    fn forecast(&self, data: LazyFrame) -> Result<LazyFrame>;

    /// Check `df` for the required columns, then forecast it eagerly.
    fn forecast_frame(&self, df: &DataFrame) -> Result<DataFrame> {
        if let Some(missing) = self
            .required_columns()
            .iter()
            .copied()
            .find(|name| df.column(name).is_err())
        {
            return Err(ScoreError::MissingColumn(missing.to_string()));
        }
        Ok(self.forecast(df.clone().lazy())?.collect()?)
    }
}

/// Configuration for the moving-average baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageConfig {
    /// Trailing window in rows (default: 28)
    pub window: usize,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self { window: 28 }
    }
}

/// Forecasts each row with the mean of the `window` rows before it.
///
/// The first `window` rows have no forecast.
#[derive(Debug, Clone, Default)]
pub struct MovingAverageForecaster {
    config: MovingAverageConfig,
}

impl MovingAverageForecaster {
    /// Create a forecaster with a custom configuration.
    pub const fn with_config(config: MovingAverageConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub const fn config(&self) -> &MovingAverageConfig {
        &self.config
    }
}

impl Forecaster for MovingAverageForecaster {
    fn name(&self) -> &str {
        "moving_average"
    }

    fn required_columns(&self) -> &[&str] {
        &[SALES]
    }

    fn forecast(&self, data: LazyFrame) -> Result<LazyFrame> {
        let window = self.config.window;
        if window == 0 {
            return Err(ScoreError::InvalidWindow(
                "moving average window must be at least 1".to_string(),
            ));
        }

        Ok(data.with_columns([col(SALES)
            .cast(DataType::Float64)
            .rolling_mean(RollingOptionsFixedWindow {
                window_size: window,
                min_periods: window,
                ..Default::default()
            })
            .shift(lit(1_i64))
            .alias(FORECAST)]))
    }
}
