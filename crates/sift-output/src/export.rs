//! Export of qualification decisions and summaries.
//!
//! Every exportable type implements [`Exporter`] and renders to CSV, compact
//! JSON or pretty JSON.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sift_panel::date_from_epoch_days;
use sift_panel::schema::DATE;
use sift_rules::columns::SHOULD_FORECAST;
use sift_rules::{PolicyKind, criteria_for};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::summary::QualificationSummary;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The frame lacks a column the export reads.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Decision for a single product-day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionExport {
    /// Product key, when the export was keyed on a product column.
    pub product_id: Option<String>,

    /// Observation date.
    pub date: Option<NaiveDate>,

    /// Final decision.
    pub should_forecast: bool,

    /// Criteria with a false verdict.
    pub failed_criteria: Vec<String>,

    /// Criteria with a null verdict.
    pub unknown_criteria: Vec<String>,
}

impl DecisionExport {
    /// One record per row of a qualified panel.
    ///
    /// `product_id` is read from `product_column` when one is given.
    ///
    /// # Errors
    /// [`ExportError::MissingColumn`] when `date`, `should_forecast`, a
    /// criterion column of `policy` or the named product column is absent.
    pub fn from_frame(
        df: &DataFrame,
        policy: PolicyKind,
        product_column: Option<&str>,
    ) -> Result<Vec<Self>, ExportError> {
        let column = |name: &str| {
            df.column(name)
                .map_err(|_| ExportError::MissingColumn(name.to_string()))
        };

        let dates: Vec<Option<NaiveDate>> = column(DATE)?
            .cast(&DataType::Date)?
            .cast(&DataType::Int32)?
            .i32()?
            .into_iter()
            .map(|days| days.and_then(date_from_epoch_days))
            .collect();
        let decisions: Vec<bool> = column(SHOULD_FORECAST)?
            .bool()?
            .into_iter()
            .map(|d| d == Some(true))
            .collect();
        let products: Option<Vec<Option<String>>> = match product_column {
            Some(name) => Some(
                column(name)?
                    .cast(&DataType::String)?
                    .str()?
                    .into_iter()
                    .map(|p| p.map(str::to_string))
                    .collect(),
            ),
            None => None,
        };

        let mut criteria = Vec::new();
        for info in criteria_for(policy) {
            let verdicts: Vec<Option<bool>> = column(info.column)?.bool()?.into_iter().collect();
            criteria.push((info.column, verdicts));
        }

        Ok((0..df.height())
            .map(|row| {
                let mut failed = Vec::new();
                let mut unknown = Vec::new();
                for (name, verdicts) in &criteria {
                    match verdicts[row] {
                        Some(true) => {}
                        Some(false) => failed.push((*name).to_string()),
                        None => unknown.push((*name).to_string()),
                    }
                }
                Self {
                    product_id: products.as_ref().and_then(|p| p[row].clone()),
                    date: dates[row],
                    should_forecast: decisions[row],
                    failed_criteria: failed,
                    unknown_criteria: unknown,
                }
            })
            .collect())
    }

    fn to_flat(&self) -> DecisionFlat {
        DecisionFlat {
            product_id: self.product_id.clone().unwrap_or_default(),
            date: self.date.map(|d| d.to_string()).unwrap_or_default(),
            should_forecast: self.should_forecast,
            failed_criteria: self.failed_criteria.join(";"),
            unknown_criteria: self.unknown_criteria.join(";"),
        }
    }
}

/// Flattened decision for CSV export.
#[derive(Debug, Serialize, Deserialize)]
struct DecisionFlat {
    product_id: String,
    date: String,
    should_forecast: bool,
    failed_criteria: String,
    unknown_criteria: String,
}

/// Flattened criterion failure for CSV export.
#[derive(Debug, Serialize, Deserialize)]
struct CriterionFlat {
    policy: String,
    criterion: String,
    failed: usize,
    unknown: usize,
    failed_pct: f64,
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn csv_string<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for Vec<DecisionExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_string(self.iter().map(DecisionExport::to_flat)),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for QualificationSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_string(self.criteria.iter().map(|c| CriterionFlat {
                policy: self.policy.to_string(),
                criterion: c.column.clone(),
                failed: c.failed,
                unknown: c.unknown,
                failed_pct: c.failed_pct,
            })),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
