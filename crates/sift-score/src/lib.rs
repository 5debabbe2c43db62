#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod backtest;
pub mod baseline;
pub mod error;
pub mod lags;
pub mod split;
pub mod wmape;

pub use backtest::{BacktestConfig, BacktestScore, backtest, backtest_by_product};
pub use baseline::{FORECAST, Forecaster, MovingAverageConfig, MovingAverageForecaster};
pub use error::{Result, ScoreError};
pub use lags::{add_lag_features, lag_column};
pub use split::{complete_feature_rows, qualified_rows, split_train_test};
pub use wmape::{WmapeVariant, wmape};
