//! Error types for panel operations.

use thiserror::Error;

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors that can occur while validating, loading or partitioning a panel.
#[derive(Debug, Error)]
pub enum PanelError {
    /// One or more required columns are absent
    #[error("Panel is missing required column(s): {}", missing.join(", "))]
    MissingColumns {
        /// Names of the absent columns, in declaration order
        missing: Vec<String>,
    },

    /// A column exists but its dtype cannot be interpreted
    #[error("Column '{column}' has dtype {actual}, expected {expected}")]
    ColumnType {
        /// Column name
        column: String,
        /// Human readable description of the accepted dtypes
        expected: &'static str,
        /// Dtype found in the panel
        actual: String,
    },

    /// The product key column used for sharding is absent
    #[error("Product key column '{0}' not found in panel")]
    MissingProductKey(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl PanelError {
    /// Whether the error describes a panel shape problem (absent columns)
    /// rather than a type or IO problem.
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::MissingColumns { .. } | Self::MissingProductKey(_))
    }
}
