//! Backtest pipeline: prices -> signals -> portfolio -> metrics.
//!
//! BacktestConfig carries the run parameters.

use chrono::NaiveDate;

use super::error::CrossoverError;
use super::metrics::Metrics;
use super::portfolio::{self, PortfolioSeries};
use super::price::PriceSeries;
use super::signal::{self, SignalSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub trade_size: u32,
    pub short_window: usize,
    pub long_window: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    pub signals: SignalSeries,
    pub portfolio: PortfolioSeries,
    pub metrics: Metrics,
}

pub fn run(prices: &PriceSeries, config: &BacktestConfig) -> Result<BacktestRun, CrossoverError> {
    let signals = signal::generate(prices, config.short_window, config.long_window)?;
    let portfolio = portfolio::simulate(&signals, config.initial_capital, config.trade_size)?;
    let metrics = Metrics::compute(&portfolio)?;
    Ok(BacktestRun {
        signals,
        portfolio,
        metrics,
    })
}
