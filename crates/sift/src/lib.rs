#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod qualify;

// Re-export main types from sub-crates
pub use sift_output as output;
pub use sift_panel as panel;
pub use sift_rules as rules;
pub use sift_score as score;

pub use qualify::{Qualification, QualifyError, qualify};
pub use sift_rules::{GatePolicy, PolicyKind};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
