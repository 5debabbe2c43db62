//! Policy and panel loading for the CLI.

use std::path::Path;

use polars::prelude::DataFrame;
use sift::{GatePolicy, PolicyKind};
use sift_panel::schema::PRODUCT_ID;
use sift_panel::{PanelError, load_panel_file_keyed};
use sift_rules::RuleError;
use tracing::{debug, info};

/// Error type for CLI input handling.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    /// Panel could not be read.
    #[error("Failed to load panel {path}: {source}")]
    Panel {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: PanelError,
    },
    /// Policy file could not be read.
    #[error("Failed to read policy file {path}: {source}")]
    PolicyFile {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Policy file is not a valid policy.
    #[error("Invalid policy in {path}: {source}")]
    Policy {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: RuleError,
    },
}

/// Resolve the policy from a JSON file, or the defaults of `kind`.
pub(crate) fn load_policy(kind: PolicyKind, config: Option<&Path>) -> Result<GatePolicy, PipelineError> {
    let Some(path) = config else {
        return Ok(GatePolicy::with_defaults(kind));
    };
    let json = std::fs::read_to_string(path).map_err(|source| PipelineError::PolicyFile {
        path: path.display().to_string(),
        source,
    })?;
    let policy = GatePolicy::from_json_str(&json).map_err(|source| PipelineError::Policy {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), policy = %policy.kind(), "loaded policy file");
    Ok(policy)
}

/// Read a panel CSV keyed on `product_column`.
pub(crate) fn load(path: &Path, product_column: &str) -> Result<DataFrame, PipelineError> {
    let panel =
        load_panel_file_keyed(path, product_column).map_err(|source| PipelineError::Panel {
            path: path.display().to_string(),
            source,
        })?;
    info!(path = %path.display(), rows = panel.height(), "loaded panel");
    Ok(panel)
}

/// The product key to shard on.
///
/// A panel without the default `product_id` column is one product. A key the
/// user named explicitly is always returned, so a missing column surfaces as
/// an error downstream.
pub(crate) fn product_key<'a>(panel: &DataFrame, column: &'a str) -> Option<&'a str> {
    if column != PRODUCT_ID || panel.column(column).is_ok() {
        Some(column)
    } else {
        debug!(column, "no product column, treating panel as one product");
        None
    }
}
