//! Qualification engine.
//!
//! Validates a panel against the schema, dispatches to the rule set selected
//! by the [`GatePolicy`] and appends the derived columns to a copy of the
//! input. Input rows are never reordered or dropped.

use polars::prelude::*;
use rayon::prelude::*;
use sift_panel::{PanelColumns, PanelSchema, concat_products, partition_by_product};
use tracing::{debug, info};

use crate::config::GatePolicy;
use crate::error::Result;
use crate::{clearance, strict};

/// Evaluates one policy over product-day panels.
#[derive(Debug, Clone, Default)]
pub struct QualificationEngine {
    policy: GatePolicy,
}

impl QualificationEngine {
    /// Create an engine for a validated policy.
    ///
    /// # Errors
    /// [`crate::RuleError::InvalidConfig`] when the policy cannot be evaluated.
    pub fn new(policy: GatePolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// The policy this engine applies.
    pub const fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    /// Qualify every row of a single-product panel.
    ///
    /// The panel must be sorted by date. Rolling windows run over the whole
    /// frame, so a multi-product panel must go through
    /// [`Self::evaluate_by_product`] instead.
    ///
    /// # Returns
    /// The input columns followed by the rolling aggregates, the per-criterion
    /// verdicts and `should_forecast`.
    pub fn evaluate(&self, panel: &DataFrame) -> Result<DataFrame> {
        let schema = PanelSchema::inspect(panel)?;
        let cols = PanelColumns::extract(panel, &schema)?;
        if cols.is_empty() {
            debug!(policy = %self.policy.kind(), "empty panel, nothing to qualify");
        }

        let derived = match &self.policy {
            GatePolicy::StrictGate(config) => strict::evaluate(&cols, config)?,
            GatePolicy::InventoryClearanceGate(config) => clearance::evaluate(&cols, config)?,
        };

        let mut out = panel.clone();
        for column in derived {
            out.with_column(column)?;
        }
        Ok(out)
    }

    /// Qualify a multi-product panel, one product at a time.
    ///
    /// Rows are grouped by `product_column` in first-appearance order and each
    /// group keeps its input order. Groups are evaluated on the rayon pool.
    pub fn evaluate_by_product(&self, panel: &DataFrame, product_column: &str) -> Result<DataFrame> {
        // Fail on schema problems once, before sharding.
        PanelSchema::inspect(panel)?;
        let shards = partition_by_product(panel, product_column)?;
        info!(
            policy = %self.policy.kind(),
            products = shards.len(),
            rows = panel.height(),
            "qualifying panel by product"
        );

        let results = shards
            .par_iter()
            .map(|shard| self.evaluate(shard))
            .collect::<Result<Vec<_>>>()?;
        Ok(concat_products(results)?)
    }
}

/// Qualify a single-product panel under `policy`.
///
/// See [`QualificationEngine::evaluate`].
pub fn evaluate(panel: &DataFrame, policy: &GatePolicy) -> Result<DataFrame> {
    let engine = QualificationEngine::new(policy.clone())?;
    info!(policy = %policy.kind(), rows = panel.height(), "qualifying panel");
    engine.evaluate(panel)
}

/// Qualify a multi-product panel under `policy`.
///
/// See [`QualificationEngine::evaluate_by_product`].
pub fn evaluate_by_product(
    panel: &DataFrame,
    product_column: &str,
    policy: &GatePolicy,
) -> Result<DataFrame> {
    QualificationEngine::new(policy.clone())?.evaluate_by_product(panel, product_column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::SHOULD_FORECAST;
    use crate::config::StrictGateConfig;
    use crate::error::RuleError;
    use sift_panel::schema::{
        COST, CURRENT_PRICE, DATE, INVENTORY, LAUNCH_DATE, MARGIN, PRODUCT_ID, SALES,
    };

    fn panel(rows: usize) -> DataFrame {
        let days: Vec<i32> = (0..rows as i32).map(|i| 19_723 + i).collect();
        DataFrame::new(vec![
            Series::new(DATE.into(), days).cast(&DataType::Date).unwrap().into(),
            Series::new(SALES.into(), vec![10.0_f64; rows]).into(),
            Series::new(LAUNCH_DATE.into(), vec![19_700_i32; rows])
                .cast(&DataType::Date)
                .unwrap()
                .into(),
            Series::new(MARGIN.into(), vec![0.5_f64; rows]).into(),
            Series::new(INVENTORY.into(), vec![100.0_f64; rows]).into(),
            Series::new(CURRENT_PRICE.into(), vec![20.0_f64; rows]).into(),
            Series::new(COST.into(), vec![10.0_f64; rows]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_input_columns_come_first() {
        let df = panel(30);
        let out = evaluate(&df, &GatePolicy::default()).unwrap();

        assert_eq!(out.height(), 30);
        let names = out.get_column_names();
        assert_eq!(names[..df.width()], df.get_column_names()[..]);
        assert_eq!(names.last().unwrap().as_str(), SHOULD_FORECAST);
    }

    #[test]
    fn test_invalid_policy_is_rejected_before_evaluation() {
        let policy = GatePolicy::StrictGate(StrictGateConfig {
            history_window: 0,
            ..Default::default()
        });
        let err = evaluate(&panel(5), &policy).unwrap_err();
        assert!(matches!(err, RuleError::InvalidConfig(_)));
    }

    #[test]
    fn test_by_product_requires_product_key() {
        let err = evaluate_by_product(&panel(5), PRODUCT_ID, &GatePolicy::default()).unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_engine_keeps_policy() {
        let engine = QualificationEngine::default();
        assert_eq!(engine.policy(), &GatePolicy::default());
    }
}
