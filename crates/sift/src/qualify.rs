//! One-call qualification with a summary.

use polars::prelude::DataFrame;
use sift_output::{DecisionExport, ExportError, QualificationSummary, SummaryError};
use sift_rules::{GatePolicy, RuleError, evaluate, evaluate_by_product};
use thiserror::Error;
use tracing::info;

/// Errors from [`qualify`].
#[derive(Debug, Error)]
pub enum QualifyError {
    /// Evaluation failed
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// The evaluated panel could not be summarized
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// An evaluated panel and its summary.
#[derive(Debug, Clone)]
pub struct Qualification {
    /// Input columns plus the derived columns
    pub frame: DataFrame,
    /// Counts over `frame`
    pub summary: QualificationSummary,
    /// Product key the panel was evaluated by, if any
    pub product_column: Option<String>,
}

impl Qualification {
    /// Per-row decisions, keyed on the same product column as the evaluation.
    pub fn decisions(&self) -> Result<Vec<DecisionExport>, ExportError> {
        DecisionExport::from_frame(
            &self.frame,
            self.summary.policy,
            self.product_column.as_deref(),
        )
    }
}

/// Evaluate `panel` under `policy` and summarize the outcome.
///
/// With a `product_column` the panel is evaluated product by product; without
/// one it is treated as a single product.
pub fn qualify(
    panel: &DataFrame,
    policy: &GatePolicy,
    product_column: Option<&str>,
) -> Result<Qualification, QualifyError> {
    let frame = match product_column {
        Some(key) => evaluate_by_product(panel, key, policy)?,
        None => evaluate(panel, policy)?,
    };
    let summary = QualificationSummary::from_frame(&frame, policy.kind(), product_column)?;
    info!(
        policy = %policy.kind(),
        rows = summary.total_rows,
        qualified = summary.qualified_rows,
        "qualification complete"
    );
    Ok(Qualification {
        frame,
        summary,
        product_column: product_column.map(str::to_string),
    })
}
