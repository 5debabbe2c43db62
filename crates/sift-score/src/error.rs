//! Error types for scoring.

use sift_panel::PanelError;
use thiserror::Error;

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Errors from the scoring stage.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A column the operation reads is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The training span does not fit in the frame
    #[error("Cannot split {rows} row(s) with a {train_days}-row training span")]
    InvalidSplit {
        /// Requested training rows
        train_days: usize,
        /// Rows available
        rows: usize,
    },

    /// A window or lag length is unusable
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// The panel could not be partitioned or stitched back together
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
