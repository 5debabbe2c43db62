//! Report generation for qualification runs.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sift_rules::PolicyKind;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A report of one qualification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Panel or run name.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Rule set the run used.
    pub policy: Option<PolicyKind>,

    /// Report sections, keyed by name.
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(title: String, policy: Option<PolicyKind>, contents: serde_json::Value) -> Self {
        Self {
            title,
            timestamp: Utc::now(),
            policy,
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    policy: Option<PolicyKind>,
    sections: serde_json::Map<String, serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the policy.
    pub const fn policy(mut self, policy: PolicyKind) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Add a named section; a later section with the same name replaces it.
    pub fn section<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self, ReportError> {
        self.sections
            .insert(name.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> Report {
        Report::new(
            self.title.unwrap_or_default(),
            self.policy,
            serde_json::Value::Object(self.sections),
        )
    }
}
