//! Core domain types and logic.
//!
//! The pipeline is three pure stages: [`signal::generate`],
//! [`portfolio::simulate`] and [`metrics::Metrics::compute`], chained by
//! [`backtest::run`].

pub mod price;
pub mod moving_average;
pub mod signal;
pub mod portfolio;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
