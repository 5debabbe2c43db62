//! CSV panel ingestion.
//!
//! Expected CSV columns:
//!   date, sales, launch_date, margin, inventory, current_price, cost
//! Optional:
//!   product_id, is_stockout, markdown_pct
//!
//! Optional columns are only materialized in the resulting frame when the
//! header carries them, so signal probing downstream sees the file's real shape.
//! The product key may live under another header; the `*_keyed` variants read
//! and write it under a caller-chosen name.

use std::io::{Read, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{PanelError, Result};
use crate::schema::{
    COST, CURRENT_PRICE, DATE, INVENTORY, IS_STOCKOUT, LAUNCH_DATE, MARGIN, MARKDOWN_PCT,
    OptionalSignals, PRODUCT_ID, REQUIRED_COLUMNS, SALES,
};

/// Days from 0001-01-01 (CE) to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a calendar date to days since the Unix epoch.
pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Convert days since the Unix epoch back to a calendar date.
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

/// One product-day row of a panel file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRecord {
    /// Product key, when the file holds several products
    #[serde(default)]
    pub product_id: Option<String>,
    /// Observation date
    pub date: NaiveDate,
    /// Units sold
    pub sales: Option<f64>,
    /// Launch date
    pub launch_date: NaiveDate,
    /// Profit rate
    pub margin: Option<f64>,
    /// Units on hand
    pub inventory: Option<f64>,
    /// Shelf price
    pub current_price: Option<f64>,
    /// Unit cost
    pub cost: Option<f64>,
    /// Stockout flag; accepts `true`/`false` or `1`/`0`
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_stockout: Option<f64>,
    /// Markdown fraction
    #[serde(default)]
    pub markdown_pct: Option<f64>,
}

/// Header a panel CSV column is ignored under while another column is the key.
const SHADOWED_PRODUCT_ID: &str = "__product_id";

/// Load a panel from a CSV reader.
///
/// # Errors
/// Returns [`PanelError::MissingColumns`] when the header lacks a required
/// column, or a CSV error carrying the offending line.
pub fn load_panel<R: Read>(reader: R) -> Result<DataFrame> {
    load_panel_keyed(reader, PRODUCT_ID)
}

/// Load a panel whose product key is stored under `product_column`.
///
/// The key keeps its name in the returned frame. A `product_id` column that is
/// not the key is dropped.
pub fn load_panel_keyed<R: Read>(reader: R, product_column: &str) -> Result<DataFrame> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(|h| {
            if h == product_column {
                PRODUCT_ID
            } else if h == PRODUCT_ID {
                SHADOWED_PRODUCT_ID
            } else {
                h
            }
        })
        .collect();
    csv_reader.set_headers(headers.clone());
    let has = |name: &str| headers.iter().any(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !has(**name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PanelError::MissingColumns { missing });
    }

    let signals = OptionalSignals {
        stockout: has(IS_STOCKOUT),
        markdown: has(MARKDOWN_PCT),
    };
    let with_product = has(PRODUCT_ID);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: PanelRecord = result?;
        records.push(record);
    }
    debug!(
        rows = records.len(),
        stockout = signals.stockout,
        markdown = signals.markdown,
        "parsed panel csv"
    );

    let mut df = records_to_frame(&records, signals, with_product)?;
    if with_product && product_column != PRODUCT_ID {
        df.rename(PRODUCT_ID, product_column.into())?;
    }
    Ok(df)
}

/// Load a panel from a CSV file path.
pub fn load_panel_file(path: impl AsRef<Path>) -> Result<DataFrame> {
    load_panel_file_keyed(path, PRODUCT_ID)
}

/// Load a panel file whose product key is stored under `product_column`.
pub fn load_panel_file_keyed(path: impl AsRef<Path>, product_column: &str) -> Result<DataFrame> {
    let file = std::fs::File::open(path)?;
    load_panel_keyed(file, product_column)
}

/// Write records as a panel CSV with the product key under `product_column`.
pub fn write_panel_keyed<W: Write>(
    writer: W,
    records: &[PanelRecord],
    product_column: &str,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record([
        product_column,
        DATE,
        SALES,
        LAUNCH_DATE,
        MARGIN,
        INVENTORY,
        CURRENT_PRICE,
        COST,
        IS_STOCKOUT,
        MARKDOWN_PCT,
    ])?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Build a panel frame from records.
///
/// Optional columns are emitted only for the signals switched on in `signals`;
/// `product_id` only when `with_product` is set.
pub fn records_to_frame(
    records: &[PanelRecord],
    signals: OptionalSignals,
    with_product: bool,
) -> Result<DataFrame> {
    let dates: Vec<i32> = records.iter().map(|r| epoch_days(r.date)).collect();
    let launch_dates: Vec<i32> = records.iter().map(|r| epoch_days(r.launch_date)).collect();
    let floats = |f: fn(&PanelRecord) -> Option<f64>| -> Vec<Option<f64>> {
        records.iter().map(f).collect()
    };

    let mut columns: Vec<Column> = Vec::with_capacity(10);
    if with_product {
        let products: Vec<Option<String>> =
            records.iter().map(|r| r.product_id.clone()).collect();
        columns.push(Series::new(PRODUCT_ID.into(), products).into());
    }
    columns.push(Series::new(DATE.into(), dates).cast(&DataType::Date)?.into());
    columns.push(Series::new(SALES.into(), floats(|r| r.sales)).into());
    columns.push(
        Series::new(LAUNCH_DATE.into(), launch_dates)
            .cast(&DataType::Date)?
            .into(),
    );
    columns.push(Series::new(MARGIN.into(), floats(|r| r.margin)).into());
    columns.push(Series::new(INVENTORY.into(), floats(|r| r.inventory)).into());
    columns.push(Series::new(CURRENT_PRICE.into(), floats(|r| r.current_price)).into());
    columns.push(Series::new(COST.into(), floats(|r| r.cost)).into());
    if signals.stockout {
        columns.push(Series::new(IS_STOCKOUT.into(), floats(|r| r.is_stockout)).into());
    }
    if signals.markdown {
        columns.push(Series::new(MARKDOWN_PCT.into(), floats(|r| r.markdown_pct)).into());
    }

    Ok(DataFrame::new(columns)?)
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "yes" | "y" | "t" => Ok(Some(1.0)),
        "false" | "no" | "n" | "f" => Ok(Some(0.0)),
        other => other
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid stockout flag '{other}'"))),
    }
}
