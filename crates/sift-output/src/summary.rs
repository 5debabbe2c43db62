//! Qualification summary.
//!
//! Counts how many rows qualified and, for every decision criterion of the
//! policy, how many rows it failed. A null verdict (insufficient history)
//! counts as a failure, matching the fail-closed final decision; the null
//! share is reported separately so short histories stay visible.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sift_rules::columns::SHOULD_FORECAST;
use sift_rules::{PolicyKind, criteria_for};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while summarizing a qualified panel.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The frame lacks a decision, criterion or product column
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Failure count of one criterion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriterionFailure {
    /// Verdict column
    pub column: String,

    /// Human label
    pub label: String,

    /// Rows where the verdict is false or null
    pub failed: usize,

    /// Rows where the verdict is null
    pub unknown: usize,

    /// `failed` as a percentage of all rows
    pub failed_pct: f64,
}

/// Qualification outcome of one panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualificationSummary {
    /// Rule set that produced the decisions
    pub policy: PolicyKind,

    /// Distinct products, when the panel carries a product key
    pub products: Option<usize>,

    /// All rows
    pub total_rows: usize,

    /// Rows with `should_forecast = true`
    pub qualified_rows: usize,

    /// `qualified_rows` as a percentage of `total_rows`
    pub qualified_pct: f64,

    /// Per-criterion failures, in evaluation order
    pub criteria: Vec<CriterionFailure>,
}

impl QualificationSummary {
    /// Summarize the output of the qualification engine.
    ///
    /// Distinct products are counted over `product_column` when one is given.
    ///
    /// # Errors
    /// [`SummaryError::MissingColumn`] when `should_forecast`, a criterion
    /// column of `policy` or the named product column is absent.
    pub fn from_frame(
        df: &DataFrame,
        policy: PolicyKind,
        product_column: Option<&str>,
    ) -> Result<Self, SummaryError> {
        let total_rows = df.height();
        let qualified_rows = verdict_counts(df, SHOULD_FORECAST)?.passed;

        let criteria = criteria_for(policy)
            .into_iter()
            .map(|info| {
                let counts = verdict_counts(df, info.column)?;
                Ok(CriterionFailure {
                    column: info.column.to_string(),
                    label: info.label.to_string(),
                    failed: total_rows - counts.passed,
                    unknown: counts.unknown,
                    failed_pct: percentage(total_rows - counts.passed, total_rows),
                })
            })
            .collect::<Result<Vec<_>, SummaryError>>()?;

        let products = match product_column {
            Some(name) => {
                let column = df
                    .column(name)
                    .map_err(|_| SummaryError::MissingColumn(name.to_string()))?;
                Some(column.as_materialized_series().n_unique()?)
            }
            None => None,
        };

        Ok(Self {
            policy,
            products,
            total_rows,
            qualified_rows,
            qualified_pct: percentage(qualified_rows, total_rows),
            criteria,
        })
    }

    /// Criterion with the most failures, if any row failed one.
    pub fn most_restrictive(&self) -> Option<&CriterionFailure> {
        self.criteria
            .iter()
            .filter(|c| c.failed > 0)
            .max_by_key(|c| c.failed)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nQualification Summary: {}\n", self.policy));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        if let Some(products) = self.products {
            output.push_str(&format!("  Products:                 {products}\n"));
        }
        output.push_str(&format!("  Total Rows:               {}\n", self.total_rows));
        output.push_str(&format!(
            "  Qualified Rows:           {} ({:.1}%)\n",
            self.qualified_rows, self.qualified_pct
        ));

        if !self.criteria.is_empty() {
            output.push_str("\nCriterion Failures:\n");
            output.push_str(&"-".repeat(64));
            output.push('\n');
            output.push_str(&format!(
                "{:<24} {:>12} {:>12} {:>12}\n",
                "Criterion", "Failed", "Unknown", "% Failed"
            ));
            output.push_str(&"-".repeat(64));
            output.push('\n');

            for criterion in &self.criteria {
                output.push_str(&format!(
                    "{:<24} {:>12} {:>12} {:>11.1}%\n",
                    criterion.label, criterion.failed, criterion.unknown, criterion.failed_pct
                ));
            }
        }

        output.push_str(&"=".repeat(64));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Qualification Summary: {}\n\n", self.policy));
        if let Some(products) = self.products {
            output.push_str(&format!("- **Products:** {products}\n"));
        }
        output.push_str(&format!("- **Total Rows:** {}\n", self.total_rows));
        output.push_str(&format!(
            "- **Qualified Rows:** {} ({:.1}%)\n\n",
            self.qualified_rows, self.qualified_pct
        ));

        if !self.criteria.is_empty() {
            output.push_str("## Criterion Failures\n\n");
            output.push_str("| Criterion | Failed | Unknown | % Failed |\n");
            output.push_str("|-----------|--------|---------|----------|\n");

            for criterion in &self.criteria {
                output.push_str(&format!(
                    "| {} | {} | {} | {:.1}% |\n",
                    criterion.label, criterion.failed, criterion.unknown, criterion.failed_pct
                ));
            }
        }

        output
    }
}

impl fmt::Display for QualificationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Qualification Summary ({})", self.policy)?;
        writeln!(
            f,
            "  Qualified: {} of {} rows ({:.1}%)",
            self.qualified_rows, self.total_rows, self.qualified_pct
        )?;
        for criterion in &self.criteria {
            writeln!(
                f,
                "  {}: {} failed ({:.1}%)",
                criterion.label, criterion.failed, criterion.failed_pct
            )?;
        }
        Ok(())
    }
}

struct VerdictCounts {
    passed: usize,
    unknown: usize,
}

fn verdict_counts(df: &DataFrame, name: &str) -> Result<VerdictCounts, SummaryError> {
    let column = df
        .column(name)
        .map_err(|_| SummaryError::MissingColumn(name.to_string()))?;
    let verdicts = column.bool()?;
    Ok(VerdictCounts {
        passed: verdicts.into_iter().filter(|v| *v == Some(true)).count(),
        unknown: verdicts.null_count(),
    })
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
