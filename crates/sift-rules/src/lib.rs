#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregates;
mod clearance;
mod strict;

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod logic;
pub mod registry;
pub mod window;

pub use config::{
    ClearanceGateConfig, ClearanceRule, GatePolicy, PolicyKind, SALES_RECENCY_WINDOW,
    StrictGateConfig,
};
pub use engine::{QualificationEngine, evaluate, evaluate_by_product};
pub use error::{Result, RuleError};
pub use logic::Verdict;
pub use registry::{CriterionInfo, available_criteria, criteria_for, get_criterion_info};
pub use window::TrailingWindow;
