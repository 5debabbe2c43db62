//! Error types for qualification.

use sift_panel::PanelError;
use thiserror::Error;

/// Result type for qualification operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors that abort a qualification call.
///
/// Short history and absent optional signals are not errors; they surface as
/// null criteria and fallback values in the output.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The panel failed schema or type validation
    #[error(transparent)]
    Panel(#[from] PanelError),

    /// The policy configuration cannot be evaluated
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl RuleError {
    /// Whether the panel is missing required columns.
    pub const fn is_schema_error(&self) -> bool {
        match self {
            Self::Panel(err) => err.is_schema_error(),
            _ => false,
        }
    }
}
