//! e2ml - Classifier evaluation and hypothesis testing
//!
//! This library provides the numeric core for evaluating classifiers:
//! confusion matrices and the scores derived from them, and one-sample,
//! paired and Wilcoxon signed-rank hypothesis tests with a uniform
//! left/right/two-sided tail contract.

pub mod cli;
pub mod config;
pub mod cross_validation;
pub mod error;
pub mod hypothesis;
pub mod metrics;
pub mod output;

pub use error::{EvalError, Result};
