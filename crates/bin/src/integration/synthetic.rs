//! Synthetic multi-product panels for demos.
//!
//! Products differ in age, demand level, margin and stock behaviour so that
//! every criterion of both policies fails somewhere in the panel.

use std::fs::File;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sift_panel::schema::PRODUCT_ID;
use sift_panel::{OptionalSignals, PanelRecord, Result, records_to_frame, write_panel_keyed};

/// Shape of a synthetic panel.
#[derive(Debug, Clone)]
pub(crate) struct SyntheticConfig {
    /// Number of products.
    pub products: usize,
    /// Consecutive days per product.
    pub days: usize,
    /// First observation date.
    pub start: NaiveDate,
    /// RNG seed.
    pub seed: u64,
    /// Name of the product key column.
    pub product_column: String,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            products: 20,
            days: 120,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            seed: 42,
            product_column: PRODUCT_ID.to_string(),
        }
    }
}

/// Generate panel records, grouped by product and sorted by date.
pub(crate) fn generate(config: &SyntheticConfig) -> Vec<PanelRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.products * config.days);

    for product in 0..config.products {
        let age = rng.gen_range(0..400_i64);
        let launch = config.start - Duration::days(age);
        let demand = rng.gen_range(0.5..25.0_f64);
        let sell_through = rng.gen_range(0.3..0.98_f64);
        let margin = rng.gen_range(-0.15..0.45_f64);
        let price = rng.gen_range(5.0..80.0_f64);
        let on_clearance = age > 180 && rng.gen_bool(0.5);
        let mut inventory = rng.gen_range(0.0..300.0_f64).floor();

        for day in 0..config.days {
            let sold = if rng.gen_bool(sell_through) && inventory > 0.0 {
                (demand * rng.gen_range(0.5..1.5)).round().min(inventory)
            } else {
                0.0
            };
            inventory -= sold;
            if inventory <= 0.0 && rng.gen_bool(0.2) {
                inventory = rng.gen_range(50.0..300.0_f64).floor();
            }
            let markdown = if on_clearance && day >= config.days / 3 { 0.4 } else { 0.0 };

            records.push(PanelRecord {
                product_id: Some(format!("SKU-{product:04}")),
                date: config.start + Duration::days(day as i64),
                sales: rng.gen_bool(0.99).then_some(sold),
                launch_date: launch,
                margin: Some(margin + rng.gen_range(-0.05..0.05)),
                inventory: Some(inventory),
                current_price: Some(price * (1.0 - markdown)),
                cost: rng.gen_bool(0.97).then_some(price * (1.0 - margin)),
                is_stockout: Some(if inventory <= 0.0 { 1.0 } else { 0.0 }),
                markdown_pct: Some(markdown),
            });
        }
    }
    records
}

/// Generate a synthetic panel frame with every optional signal.
pub(crate) fn panel(config: &SyntheticConfig) -> Result<DataFrame> {
    let mut df = records_to_frame(&generate(config), OptionalSignals::all(), true)?;
    if config.product_column != PRODUCT_ID {
        df.rename(PRODUCT_ID, config.product_column.as_str().into())?;
    }
    Ok(df)
}

/// Write the synthetic panel as CSV.
pub(crate) fn write_csv(config: &SyntheticConfig, path: &Path) -> Result<()> {
    write_panel_keyed(File::create(path)?, &generate(config), &config.product_column)
}
