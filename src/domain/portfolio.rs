//! Long/flat portfolio simulation and equity tracking.

use super::error::CrossoverError;
use super::signal::SignalSeries;
use chrono::NaiveDate;

pub const DEFAULT_TRADE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPoint {
    pub date: NaiveDate,
    pub shares_held: f64,
    pub holdings_value: f64,
    pub cash: f64,
    pub total_equity: f64,
    /// Fractional change in total equity; `None` for the first point and
    /// after a point with zero equity.
    pub period_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSeries {
    pub initial_capital: f64,
    pub trade_size: u32,
    pub points: Vec<PortfolioPoint>,
}

impl PortfolioSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Period returns after the first point, skipping undefined ones.
    pub fn returns(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.period_return).collect()
    }

    pub fn equity_curve(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.total_equity)
    }
}

pub fn simulate(
    signals: &SignalSeries,
    initial_capital: f64,
    trade_size: u32,
) -> Result<PortfolioSeries, CrossoverError> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(CrossoverError::InvalidCapital {
            capital: initial_capital,
        });
    }
    if trade_size == 0 {
        return Err(CrossoverError::InvalidTradeSize);
    }
    if signals.is_empty() {
        return Err(CrossoverError::EmptySignalSeries);
    }

    let shares_per_trade = f64::from(trade_size);
    let mut points: Vec<PortfolioPoint> = Vec::with_capacity(signals.len());
    let mut spent = 0.0_f64;

    for point in &signals.points {
        let shares_held = shares_per_trade * point.signal;
        let prev = points.last();

        let delta_shares = prev.map_or(0.0, |p| shares_held - p.shares_held);
        spent += delta_shares * point.price;
        let cash = initial_capital - spent;

        let holdings_value = shares_held * point.price;
        let total_equity = cash + holdings_value;
        let period_return = prev
            .filter(|p| p.total_equity != 0.0)
            .map(|p| (total_equity - p.total_equity) / p.total_equity);

        points.push(PortfolioPoint {
            date: point.date,
            shares_held,
            holdings_value,
            cash,
            total_equity,
            period_return,
        });
    }

    Ok(PortfolioSeries {
        initial_capital,
        trade_size,
        points,
    })
}
