//! Names of the columns the engine appends.

use polars::prelude::*;

/// Whole days between `launch_date` and `date`.
pub const DAYS_SINCE_LAUNCH: &str = "days_since_launch";
/// Days with positive sales in the trailing 14 rows.
pub const RECENT_SALES_COUNT: &str = "recent_sales_count";
/// Trailing mean margin.
pub const ROLLING_AVG_MARGIN: &str = "rolling_avg_margin";
/// Trailing mean of the stockout flag.
pub const ROLLING_STOCKOUT_RATE: &str = "rolling_stockout_rate";
/// Row-wise minimum of the per-field quality rates.
pub const MIN_DATA_QUALITY: &str = "min_data_quality";

/// Sales recency criterion.
pub const PASS_SALES_RECENCY: &str = "pass_sales_recency";
/// Inventory age criterion.
pub const PASS_INVENTORY_AGE: &str = "pass_inventory_age";
/// Profitability criterion.
pub const PASS_PROFITABILITY: &str = "pass_profitability";
/// Stockout rate criterion.
pub const PASS_STOCKOUT_RATE: &str = "pass_stockout_rate";
/// Data quality criterion.
pub const PASS_DATA_QUALITY: &str = "pass_data_quality";
/// Inventory on hand criterion.
pub const PASS_INVENTORY: &str = "pass_inventory";
/// New product flag.
pub const IS_NEW_PRODUCT: &str = "is_new_product";
/// New product exemption or sales recency.
pub const PASS_PRODUCT_AGE_RULE: &str = "pass_product_age_rule";
/// Clearance markdown criterion.
pub const PASS_CLEARANCE_SALES: &str = "pass_clearance_sales";

/// Final decision.
pub const SHOULD_FORECAST: &str = "should_forecast";

/// Name of the trailing non-null rate column of a watched field.
pub fn quality_column(field: &str) -> String {
    format!("quality_{field}")
}

pub(crate) fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into()
}

pub(crate) fn day_column(name: &str, values: Vec<Option<i32>>) -> Column {
    Series::new(name.into(), values).into()
}

pub(crate) fn verdict_column(name: &str, values: Vec<Option<bool>>) -> Column {
    Series::new(name.into(), values).into()
}

pub(crate) fn decision_column(values: Vec<bool>) -> Column {
    Series::new(SHOULD_FORECAST.into(), values).into()
}
