//! Performance metrics for a simulated portfolio.

use super::error::CrossoverError;
use super::portfolio::PortfolioSeries;
use std::fmt;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub cumulative_return: f64,
    /// `None` when the ratio is undefined (see [`Metrics::sharpe`]).
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough fall in total equity, in currency units.
    pub max_drawdown: f64,
    pub trades: usize,
}

impl Metrics {
    pub fn compute(portfolio: &PortfolioSeries) -> Result<Self, CrossoverError> {
        let points = &portfolio.points;
        if points.len() < 2 {
            return Err(CrossoverError::InsufficientData {
                points: points.len(),
            });
        }

        let first = points[0].total_equity;
        let last = points[points.len() - 1].total_equity;
        let cumulative_return = (last - first) / first;

        let sharpe_ratio = sharpe_ratio(&portfolio.returns()).ok();
        let max_drawdown = compute_drawdown(portfolio.equity_curve());

        let mut trades = 0usize;
        for pair in points.windows(2) {
            if pair[1].shares_held != pair[0].shares_held {
                trades += 1;
            }
        }

        Ok(Metrics {
            cumulative_return,
            sharpe_ratio,
            max_drawdown,
            trades,
        })
    }

    /// The Sharpe ratio, or `UndefinedSharpe` when it could not be computed.
    pub fn sharpe(&self) -> Result<f64, CrossoverError> {
        self.sharpe_ratio.ok_or(CrossoverError::UndefinedSharpe)
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cumulative Returns: {:.2}%",
            self.cumulative_return * 100.0
        )?;
        match self.sharpe_ratio {
            Some(sharpe) => writeln!(f, "Sharpe Ratio: {:.2}", sharpe)?,
            None => writeln!(f, "Sharpe Ratio: n/a")?,
        }
        writeln!(f, "Max Drawdown: {:.2}", self.max_drawdown)?;
        write!(f, "Trades: {}", self.trades)
    }
}

/// Annualised mean over sample standard deviation of period returns.
pub fn sharpe_ratio(returns: &[f64]) -> Result<f64, CrossoverError> {
    if returns.len() < 2 {
        return Err(CrossoverError::UndefinedSharpe);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if !stddev.is_finite() || stddev <= 0.0 {
        return Err(CrossoverError::UndefinedSharpe);
    }

    Ok(TRADING_DAYS_PER_YEAR.sqrt() * mean / stddev)
}

/// Maximum of (running peak - equity), 0 for a non-decreasing curve.
pub fn compute_drawdown<I>(equity_curve: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        let dd = peak - equity;
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}
