//! Policy configuration.
//!
//! A [`GatePolicy`] selects one rule set and carries its thresholds. Policies
//! round-trip through JSON with a `policy` tag:
//!
//! ```json
//! { "policy": "inventory_clearance_gate", "new_product_days": 21 }
//! ```
//!
//! Omitted fields take their defaults.

use std::num::NonZeroUsize;
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};

/// Trailing window of the sales recency count, in rows.
pub const SALES_RECENCY_WINDOW: NonZeroUsize = match NonZeroUsize::new(14) {
    Some(n) => n,
    None => unreachable!(),
};

/// Configuration for the strict multi-factor gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrictGateConfig {
    /// Minimum days with sales in the trailing 14 rows (default: 7)
    pub min_recent_sales_days: u32,
    /// Maximum trailing stockout rate (default: 0.5)
    pub max_stockout_rate: f64,
    /// Minimum trailing mean margin (default: 0.0)
    pub min_margin: f64,
    /// Minimum trailing non-null rate across watched fields (default: 0.9)
    pub min_data_quality_pct: f64,
    /// Maximum days since launch (default: 180)
    pub max_inventory_age_days: i64,
    /// Window for margin, stockout and quality aggregates (default: 28)
    pub history_window: usize,
}

impl Default for StrictGateConfig {
    fn default() -> Self {
        Self {
            min_recent_sales_days: 7,
            max_stockout_rate: 0.5,
            min_margin: 0.0,
            min_data_quality_pct: 0.9,
            max_inventory_age_days: 180,
            history_window: 28,
        }
    }
}

impl StrictGateConfig {
    /// History window as a non-zero row count.
    pub fn window(&self) -> Result<NonZeroUsize> {
        history_window(self.history_window)
    }

    fn validate(&self) -> Result<()> {
        self.window()?;
        finite("max_stockout_rate", self.max_stockout_rate)?;
        finite("min_margin", self.min_margin)?;
        finite("min_data_quality_pct", self.min_data_quality_pct)
    }
}

/// How the clearance criterion combines with the product age rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceRule {
    /// Clearance is one more criterion in the conjunction
    #[default]
    #[display("required")]
    Required,
    /// Clearance stands in for the product age rule
    #[display("overrides_age_rule")]
    OverridesAgeRule,
}

/// Configuration for the inventory / clearance gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearanceGateConfig {
    /// Minimum days with sales in the trailing 14 rows (default: 7)
    pub min_recent_sales_days: u32,
    /// Minimum trailing mean margin (default: 0.0)
    pub min_margin: f64,
    /// Window for the margin aggregate (default: 28)
    pub history_window: usize,
    /// Products launched within this many days skip sales recency (default: 14)
    pub new_product_days: i64,
    /// Markdown fraction that marks a clearance sale (default: 0.3)
    pub clearance_markdown_pct: f64,
    /// Combination of the clearance criterion (default: required)
    pub clearance_rule: ClearanceRule,
}

impl Default for ClearanceGateConfig {
    fn default() -> Self {
        Self {
            min_recent_sales_days: 7,
            min_margin: 0.0,
            history_window: 28,
            new_product_days: 14,
            clearance_markdown_pct: 0.3,
            clearance_rule: ClearanceRule::Required,
        }
    }
}

impl ClearanceGateConfig {
    /// History window as a non-zero row count.
    pub fn window(&self) -> Result<NonZeroUsize> {
        history_window(self.history_window)
    }

    fn validate(&self) -> Result<()> {
        self.window()?;
        finite("min_margin", self.min_margin)?;
        finite("clearance_markdown_pct", self.clearance_markdown_pct)
    }
}

/// Rule set identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Strict multi-factor gate
    #[display("strict_gate")]
    StrictGate,
    /// Inventory / clearance gate
    #[display("inventory_clearance_gate")]
    InventoryClearanceGate,
}

impl FromStr for PolicyKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "strict" | "strict_gate" => Ok(Self::StrictGate),
            "clearance" | "inventory_clearance" | "inventory_clearance_gate" => {
                Ok(Self::InventoryClearanceGate)
            }
            other => Err(RuleError::InvalidConfig(format!("unknown policy '{other}'"))),
        }
    }
}

/// A selectable qualification rule set with its thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum GatePolicy {
    /// Strict multi-factor gate
    StrictGate(StrictGateConfig),
    /// Inventory / clearance gate
    InventoryClearanceGate(ClearanceGateConfig),
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::StrictGate(StrictGateConfig::default())
    }
}

impl GatePolicy {
    /// Default thresholds for a rule set.
    pub fn with_defaults(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::StrictGate => Self::StrictGate(StrictGateConfig::default()),
            PolicyKind::InventoryClearanceGate => {
                Self::InventoryClearanceGate(ClearanceGateConfig::default())
            }
        }
    }

    /// Which rule set this is.
    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::StrictGate(_) => PolicyKind::StrictGate,
            Self::InventoryClearanceGate(_) => PolicyKind::InventoryClearanceGate,
        }
    }

    /// Trailing window of the history aggregates.
    pub const fn history_window(&self) -> usize {
        match self {
            Self::StrictGate(config) => config.history_window,
            Self::InventoryClearanceGate(config) => config.history_window,
        }
    }

    /// Check that the policy can be evaluated.
    ///
    /// # Errors
    /// [`RuleError::InvalidConfig`] for a zero-length window or a NaN / infinite
    /// threshold.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::StrictGate(config) => config.validate(),
            Self::InventoryClearanceGate(config) => config.validate(),
        }
    }

    /// Parse and validate a policy from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Serialize the policy to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn history_window(rows: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(rows)
        .ok_or_else(|| RuleError::InvalidConfig("history_window must be at least 1".to_string()))
}

fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RuleError::InvalidConfig(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}
