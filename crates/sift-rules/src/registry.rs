//! Criterion Registry
//!
//! Metadata for every decision criterion, grouped by rule set. Reports use it
//! to label failure counts; the CLI uses it to list what a policy checks.

use crate::columns::{
    PASS_CLEARANCE_SALES, PASS_DATA_QUALITY, PASS_INVENTORY, PASS_INVENTORY_AGE,
    PASS_PRODUCT_AGE_RULE, PASS_PROFITABILITY, PASS_SALES_RECENCY, PASS_STOCKOUT_RATE,
};
use crate::config::PolicyKind;

/// Criterion metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionInfo {
    /// Output column holding the per-row verdict
    pub column: &'static str,
    /// Short human label
    pub label: &'static str,
    /// Rule set the criterion belongs to
    pub policy: PolicyKind,
    /// What the criterion checks
    pub description: &'static str,
}

/// All decision criteria of all rule sets.
pub fn available_criteria() -> Vec<CriterionInfo> {
    vec![
        // Strict gate
        CriterionInfo {
            column: PASS_SALES_RECENCY,
            label: "Sales Recency",
            policy: PolicyKind::StrictGate,
            description: "Days with sales in the trailing 14 rows reach the minimum",
        },
        CriterionInfo {
            column: PASS_INVENTORY_AGE,
            label: "Inventory Age",
            policy: PolicyKind::StrictGate,
            description: "Days since launch stay within the maximum age",
        },
        CriterionInfo {
            column: PASS_PROFITABILITY,
            label: "Profitability",
            policy: PolicyKind::StrictGate,
            description: "Trailing mean margin reaches the minimum",
        },
        CriterionInfo {
            column: PASS_STOCKOUT_RATE,
            label: "Stockout Rate",
            policy: PolicyKind::StrictGate,
            description: "Trailing stockout rate stays within the maximum",
        },
        CriterionInfo {
            column: PASS_DATA_QUALITY,
            label: "Data Quality",
            policy: PolicyKind::StrictGate,
            description: "Worst trailing non-null rate of sales, inventory, price and cost",
        },
        // Inventory / clearance gate
        CriterionInfo {
            column: PASS_INVENTORY,
            label: "Inventory",
            policy: PolicyKind::InventoryClearanceGate,
            description: "Units on hand are positive",
        },
        CriterionInfo {
            column: PASS_PRODUCT_AGE_RULE,
            label: "Product Age Rule",
            policy: PolicyKind::InventoryClearanceGate,
            description: "New product, or enough days with sales in the trailing 14 rows",
        },
        CriterionInfo {
            column: PASS_PROFITABILITY,
            label: "Profitability",
            policy: PolicyKind::InventoryClearanceGate,
            description: "Trailing mean margin reaches the minimum",
        },
        CriterionInfo {
            column: PASS_CLEARANCE_SALES,
            label: "Clearance Sales",
            policy: PolicyKind::InventoryClearanceGate,
            description: "Markdown reaches the clearance threshold",
        },
    ]
}

/// Decision criteria of one rule set, in evaluation order.
pub fn criteria_for(policy: PolicyKind) -> Vec<CriterionInfo> {
    available_criteria()
        .into_iter()
        .filter(|c| c.policy == policy)
        .collect()
}

/// Look up a criterion of a rule set by output column.
pub fn get_criterion_info(policy: PolicyKind, column: &str) -> Option<CriterionInfo> {
    criteria_for(policy).into_iter().find(|c| c.column == column)
}
