//! Panel schema: required columns and optional signal probing.
//!
//! The schema is checked once at the boundary. The result is a [`PanelSchema`]
//! carrying the [`OptionalSignals`] the panel offers, so downstream code can
//! match on signal availability instead of re-checking column names.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

/// Observation date column.
pub const DATE: &str = "date";
/// Units sold on the day.
pub const SALES: &str = "sales";
/// Product launch date column.
pub const LAUNCH_DATE: &str = "launch_date";
/// Profit rate column.
pub const MARGIN: &str = "margin";
/// Units on hand column.
pub const INVENTORY: &str = "inventory";
/// Shelf price column.
pub const CURRENT_PRICE: &str = "current_price";
/// Unit cost column.
pub const COST: &str = "cost";
/// Optional stockout flag column.
pub const IS_STOCKOUT: &str = "is_stockout";
/// Optional markdown fraction column.
pub const MARKDOWN_PCT: &str = "markdown_pct";
/// Default product key for multi-product panels.
pub const PRODUCT_ID: &str = "product_id";

/// Columns every panel must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    SALES,
    DATE,
    LAUNCH_DATE,
    MARGIN,
    INVENTORY,
    CURRENT_PRICE,
    COST,
];

/// Fields whose non-null rate feeds the data quality score.
pub const QUALITY_COLUMNS: [&str; 4] = [SALES, INVENTORY, CURRENT_PRICE, COST];

/// Optional signals detected on a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionalSignals {
    /// `is_stockout` is present
    pub stockout: bool,
    /// `markdown_pct` is present
    pub markdown: bool,
}

impl OptionalSignals {
    /// Every optional signal present.
    pub const fn all() -> Self {
        Self {
            stockout: true,
            markdown: true,
        }
    }

    /// No optional signal present.
    pub const fn none() -> Self {
        Self {
            stockout: false,
            markdown: false,
        }
    }
}

/// Validated shape of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSchema {
    signals: OptionalSignals,
}

impl PanelSchema {
    /// Validate a panel and detect its optional signals.
    ///
    /// # Errors
    /// - [`PanelError::MissingColumns`] listing every absent required column
    /// - [`PanelError::ColumnType`] when a present column has an unusable dtype
    pub fn inspect(df: &DataFrame) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| df.column(**name).is_err())
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PanelError::MissingColumns { missing });
        }

        for name in [DATE, LAUNCH_DATE] {
            check_dtype(df, name, "Date or Datetime", is_temporal)?;
        }
        for name in [SALES, MARGIN, INVENTORY, CURRENT_PRICE, COST] {
            check_dtype(df, name, "a numeric type", is_numeric)?;
        }

        let stockout = df.column(IS_STOCKOUT).is_ok();
        if stockout {
            check_dtype(df, IS_STOCKOUT, "Boolean or a numeric type", |dtype| {
                dtype.is_bool() || is_numeric(dtype)
            })?;
        }
        let markdown = df.column(MARKDOWN_PCT).is_ok();
        if markdown {
            check_dtype(df, MARKDOWN_PCT, "a numeric type", is_numeric)?;
        }

        Ok(Self {
            signals: OptionalSignals { stockout, markdown },
        })
    }

    /// Optional signals available on the panel.
    pub const fn signals(&self) -> OptionalSignals {
        self.signals
    }
}

fn check_dtype(
    df: &DataFrame,
    name: &str,
    expected: &'static str,
    accept: impl Fn(&DataType) -> bool,
) -> Result<()> {
    let dtype = df.column(name)?.dtype();
    if accept(dtype) {
        Ok(())
    } else {
        Err(PanelError::ColumnType {
            column: name.to_string(),
            expected,
            actual: dtype.to_string(),
        })
    }
}

// An all-null column has dtype Null; it is a data quality problem, not a type error.
fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_float() || dtype.is_integer() || matches!(dtype, DataType::Null)
}

fn is_temporal(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Date | DataType::Datetime(_, _))
}
