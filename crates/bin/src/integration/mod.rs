//! Glue between the command line and the library crates.
//!
//! Logging setup, policy and panel loading, and the synthetic panel behind
//! `sift demo`.

pub(crate) mod logging;
pub(crate) mod pipeline;
pub(crate) mod synthetic;
