//! Rolling aggregates shared by both rule sets.

use std::num::NonZeroUsize;

use crate::config::SALES_RECENCY_WINDOW;
use crate::window::{rolling_mean, rolling_sum};

/// Days with `sales > 0` in the trailing 14 rows.
pub(crate) fn recent_sales_count(sales: &[Option<f64>]) -> Vec<Option<i32>> {
    let sold: Vec<Option<f64>> = sales
        .iter()
        .map(|s| s.map(|units| if units > 0.0 { 1.0 } else { 0.0 }))
        .collect();
    rolling_sum(&sold, SALES_RECENCY_WINDOW)
        .into_iter()
        .map(|count| count.map(|c| c.round() as i32))
        .collect()
}

/// Trailing mean margin.
pub(crate) fn rolling_margin(margin: &[Option<f64>], window: NonZeroUsize) -> Vec<Option<f64>> {
    rolling_mean(margin, window)
}
