//! Strict multi-factor gate.
//!
//! A row qualifies only when sales recency, inventory age, profitability,
//! stockout rate and data quality all pass.

use polars::lazy::dsl::min_horizontal;
use polars::prelude::*;
use sift_panel::{PanelColumns, Signal};
use tracing::debug;

use crate::aggregates::{recent_sales_count, rolling_margin};
use crate::columns::{
    DAYS_SINCE_LAUNCH, MIN_DATA_QUALITY, PASS_DATA_QUALITY, PASS_INVENTORY_AGE,
    PASS_PROFITABILITY, PASS_SALES_RECENCY, PASS_STOCKOUT_RATE, RECENT_SALES_COUNT,
    ROLLING_AVG_MARGIN, ROLLING_STOCKOUT_RATE, day_column, decision_column, float_column,
    quality_column, verdict_column,
};
use crate::config::StrictGateConfig;
use crate::error::Result;
use crate::logic::{Verdict, all_pass, at_least, at_most};
use crate::window::{rolling_mean, rolling_non_null_rate};

/// Derived columns of the strict gate, in output order.
pub(crate) fn evaluate(cols: &PanelColumns, config: &StrictGateConfig) -> Result<Vec<Column>> {
    let window = config.window()?;
    let rows = cols.len();

    let recent_sales = recent_sales_count(&cols.sales);
    let days_since_launch = cols.days_since_launch();
    let margin = rolling_margin(&cols.margin, window);
    let stockout_rate = match &cols.stockout {
        Signal::Observed(flags) => rolling_mean(flags, window),
        Signal::Absent => {
            debug!("is_stockout absent, stockout rate falls back to 0.0");
            vec![Some(0.0); rows]
        }
    };

    let quality: Vec<Column> = cols
        .quality_fields()
        .iter()
        .map(|&(field, values)| {
            float_column(&quality_column(field), rolling_non_null_rate(values, window))
        })
        .collect();
    let min_quality = row_minimum(&quality)?;

    let min_sales_days = i64::from(config.min_recent_sales_days);
    let pass_sales_recency: Vec<Verdict> = recent_sales
        .iter()
        .map(|count| at_least(count.map(i64::from), min_sales_days))
        .collect();
    let pass_inventory_age: Vec<Verdict> = days_since_launch
        .iter()
        .map(|days| at_most(days.map(i64::from), config.max_inventory_age_days))
        .collect();
    let pass_profitability: Vec<Verdict> = margin
        .iter()
        .map(|m| at_least(*m, config.min_margin))
        .collect();
    let pass_stockout_rate: Vec<Verdict> = stockout_rate
        .iter()
        .map(|rate| at_most(*rate, config.max_stockout_rate))
        .collect();
    let pass_data_quality: Vec<Verdict> = min_quality
        .iter()
        .map(|q| at_least(*q, config.min_data_quality_pct))
        .collect();

    let decision: Vec<bool> = (0..rows)
        .map(|i| {
            all_pass([
                pass_sales_recency[i],
                pass_inventory_age[i],
                pass_profitability[i],
                pass_stockout_rate[i],
                pass_data_quality[i],
            ])
        })
        .collect();

    let mut columns = vec![
        day_column(RECENT_SALES_COUNT, recent_sales),
        day_column(DAYS_SINCE_LAUNCH, days_since_launch),
        float_column(ROLLING_AVG_MARGIN, margin),
        float_column(ROLLING_STOCKOUT_RATE, stockout_rate),
    ];
    columns.extend(quality);
    columns.extend([
        float_column(MIN_DATA_QUALITY, min_quality),
        verdict_column(PASS_SALES_RECENCY, pass_sales_recency),
        verdict_column(PASS_INVENTORY_AGE, pass_inventory_age),
        verdict_column(PASS_PROFITABILITY, pass_profitability),
        verdict_column(PASS_STOCKOUT_RATE, pass_stockout_rate),
        verdict_column(PASS_DATA_QUALITY, pass_data_quality),
        decision_column(decision),
    ]);
    Ok(columns)
}

/// Row-wise minimum over the non-null values of `columns`.
fn row_minimum(columns: &[Column]) -> Result<Vec<Option<f64>>> {
    let exprs: Vec<Expr> = columns.iter().map(|c| col(c.name().clone())).collect();
    let out = DataFrame::new(columns.to_vec())?
        .lazy()
        .select([min_horizontal(exprs)?.alias(MIN_DATA_QUALITY)])
        .collect()?;
    Ok(out.column(MIN_DATA_QUALITY)?.f64()?.into_iter().collect())
}
