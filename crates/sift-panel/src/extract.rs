//! Typed column views over a validated panel.

use polars::prelude::*;

use crate::error::Result;
use crate::schema::{
    COST, CURRENT_PRICE, DATE, INVENTORY, IS_STOCKOUT, LAUNCH_DATE, MARGIN, MARKDOWN_PCT,
    PanelSchema, SALES,
};

/// An optional panel signal, either observed row by row or absent from the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal<T> {
    /// The column exists; one value per row, null where missing
    Observed(Vec<Option<T>>),
    /// The column does not exist on this panel
    Absent,
}

impl<T> Signal<T> {
    /// Whether the signal was observed.
    pub const fn is_observed(&self) -> bool {
        matches!(self, Self::Observed(_))
    }
}

/// Row-aligned values of every column the qualification rules read.
///
/// Dates are kept as days since the Unix epoch, which is the physical
/// representation of a polars `Date`.
#[derive(Debug, Clone)]
pub struct PanelColumns {
    /// Observation dates
    pub dates: Vec<Option<i32>>,
    /// Launch dates
    pub launch_dates: Vec<Option<i32>>,
    /// Units sold
    pub sales: Vec<Option<f64>>,
    /// Profit rate
    pub margin: Vec<Option<f64>>,
    /// Units on hand
    pub inventory: Vec<Option<f64>>,
    /// Shelf price
    pub current_price: Vec<Option<f64>>,
    /// Unit cost
    pub cost: Vec<Option<f64>>,
    /// Stockout flag as 0.0 / 1.0
    pub stockout: Signal<f64>,
    /// Markdown fraction
    pub markdown: Signal<f64>,
}

impl PanelColumns {
    /// Pull typed columns out of a panel that passed [`PanelSchema::inspect`].
    pub fn extract(df: &DataFrame, schema: &PanelSchema) -> Result<Self> {
        let signals = schema.signals();

        let stockout = if signals.stockout {
            Signal::Observed(float_values(df, IS_STOCKOUT)?)
        } else {
            Signal::Absent
        };
        let markdown = if signals.markdown {
            Signal::Observed(float_values(df, MARKDOWN_PCT)?)
        } else {
            Signal::Absent
        };

        Ok(Self {
            dates: day_values(df, DATE)?,
            launch_dates: day_values(df, LAUNCH_DATE)?,
            sales: float_values(df, SALES)?,
            margin: float_values(df, MARGIN)?,
            inventory: float_values(df, INVENTORY)?,
            current_price: float_values(df, CURRENT_PRICE)?,
            cost: float_values(df, COST)?,
            stockout,
            markdown,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Whole days between launch and observation, null if either date is null
    /// or the span does not fit in `i32`.
    pub fn days_since_launch(&self) -> Vec<Option<i32>> {
        self.dates
            .iter()
            .zip(&self.launch_dates)
            .map(|(date, launch)| (*date)?.checked_sub((*launch)?))
            .collect()
    }

    /// The watched fields of the data quality score, by column name.
    pub fn quality_fields(&self) -> [(&'static str, &[Option<f64>]); 4] {
        [
            (SALES, &self.sales),
            (INVENTORY, &self.inventory),
            (CURRENT_PRICE, &self.current_price),
            (COST, &self.cost),
        ]
    }
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn day_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let column = df
        .column(name)?
        .cast(&DataType::Date)?
        .cast(&DataType::Int32)?;
    Ok(column.i32()?.into_iter().collect())
}
