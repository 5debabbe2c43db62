//! Product partitioning for multi-product panels.
//!
//! Rolling windows must never span two products, so a multi-product panel is
//! split into one frame per product key before evaluation and stitched back
//! together afterwards.

use polars::prelude::*;
use tracing::debug;

use crate::error::{PanelError, Result};

/// Split a panel into one frame per product key.
///
/// Groups appear in first-appearance order and each group keeps the row order
/// of the input. An empty panel yields a single empty frame so the schema
/// survives the round trip.
pub fn partition_by_product(df: &DataFrame, key: &str) -> Result<Vec<DataFrame>> {
    if df.column(key).is_err() {
        return Err(PanelError::MissingProductKey(key.to_string()));
    }
    if df.height() == 0 {
        return Ok(vec![df.clone()]);
    }

    let parts = df.partition_by_stable([key], true)?;
    debug!(key, products = parts.len(), rows = df.height(), "partitioned panel");
    Ok(parts)
}

/// Stack per-product frames back into one panel.
///
/// All frames must share a schema, which holds for frames produced by the
/// same evaluation.
pub fn concat_products(parts: Vec<DataFrame>) -> Result<DataFrame> {
    let mut parts = parts.into_iter();
    let Some(mut combined) = parts.next() else {
        return Ok(DataFrame::empty());
    };
    for part in parts {
        combined.vstack_mut(&part)?;
    }
    Ok(combined)
}
