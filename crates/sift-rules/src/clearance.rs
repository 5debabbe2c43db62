//! Inventory / clearance gate.
//!
//! Requires stock on hand and profitability. New products are exempt from the
//! sales recency requirement, and a markdown at or above the clearance
//! threshold marks the row as a clearance sale.

use polars::prelude::Column;
use sift_panel::{PanelColumns, Signal};
use tracing::debug;

use crate::aggregates::{recent_sales_count, rolling_margin};
use crate::columns::{
    DAYS_SINCE_LAUNCH, IS_NEW_PRODUCT, PASS_CLEARANCE_SALES, PASS_INVENTORY,
    PASS_PRODUCT_AGE_RULE, PASS_PROFITABILITY, PASS_SALES_RECENCY, RECENT_SALES_COUNT,
    ROLLING_AVG_MARGIN, day_column, decision_column, float_column, verdict_column,
};
use crate::config::{ClearanceGateConfig, ClearanceRule};
use crate::error::Result;
use crate::logic::{Verdict, above, all_pass, at_least, at_most, or};

/// Derived columns of the clearance gate, in output order.
pub(crate) fn evaluate(cols: &PanelColumns, config: &ClearanceGateConfig) -> Result<Vec<Column>> {
    let window = config.window()?;
    let rows = cols.len();

    let recent_sales = recent_sales_count(&cols.sales);
    let days_since_launch = cols.days_since_launch();
    let margin = rolling_margin(&cols.margin, window);

    let pass_inventory: Vec<Verdict> = cols.inventory.iter().map(|inv| above(*inv, 0.0)).collect();
    let is_new_product: Vec<Verdict> = days_since_launch
        .iter()
        .map(|days| at_most(days.map(i64::from), config.new_product_days))
        .collect();
    let min_sales_days = i64::from(config.min_recent_sales_days);
    let pass_sales_recency: Vec<Verdict> = recent_sales
        .iter()
        .map(|count| at_least(count.map(i64::from), min_sales_days))
        .collect();
    let pass_product_age_rule: Vec<Verdict> = is_new_product
        .iter()
        .zip(&pass_sales_recency)
        .map(|(is_new, recency)| or(*is_new, *recency))
        .collect();
    let pass_profitability: Vec<Verdict> = margin
        .iter()
        .map(|m| at_least(*m, config.min_margin))
        .collect();
    // Clearance is opt-in: an absent markdown column means "not on clearance".
    let pass_clearance_sales: Vec<Verdict> = match &cols.markdown {
        Signal::Observed(markdown) => markdown
            .iter()
            .map(|pct| at_least(*pct, config.clearance_markdown_pct))
            .collect(),
        Signal::Absent => {
            debug!("markdown_pct absent, no row is on clearance");
            vec![Some(false); rows]
        }
    };

    let decision: Vec<bool> = (0..rows)
        .map(|i| match config.clearance_rule {
            ClearanceRule::Required => all_pass([
                pass_inventory[i],
                pass_product_age_rule[i],
                pass_profitability[i],
                pass_clearance_sales[i],
            ]),
            ClearanceRule::OverridesAgeRule => all_pass([
                pass_inventory[i],
                pass_profitability[i],
                or(pass_product_age_rule[i], pass_clearance_sales[i]),
            ]),
        })
        .collect();

    Ok(vec![
        day_column(RECENT_SALES_COUNT, recent_sales),
        day_column(DAYS_SINCE_LAUNCH, days_since_launch),
        float_column(ROLLING_AVG_MARGIN, margin),
        verdict_column(PASS_INVENTORY, pass_inventory),
        verdict_column(IS_NEW_PRODUCT, is_new_product),
        verdict_column(PASS_SALES_RECENCY, pass_sales_recency),
        verdict_column(PASS_PRODUCT_AGE_RULE, pass_product_age_rule),
        verdict_column(PASS_PROFITABILITY, pass_profitability),
        verdict_column(PASS_CLEARANCE_SALES, pass_clearance_sales),
        decision_column(decision),
    ])
}
