//! Moving average crossover signal generation.
//!
//! signal[i] = 0 for i < short_window (fixed warm-up policy), otherwise
//! 1 when SMA(short)[i] > SMA(long)[i] and 0 when it is not.
//! position_change[i] = signal[i] - signal[i-1], absent at i = 0.

use super::error::CrossoverError;
use super::moving_average::RollingMean;
use super::price::PriceSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub short_mavg: f64,
    pub long_mavg: f64,
    /// 1.0 when long, 0.0 when flat.
    pub signal: f64,
    /// `None` for the first point.
    pub position_change: Option<f64>,
}

impl SignalPoint {
    pub fn is_buy(&self) -> bool {
        self.position_change == Some(1.0)
    }

    pub fn is_sell(&self) -> bool {
        self.position_change == Some(-1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub short_window: usize,
    pub long_window: usize,
    pub points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn buy_points(&self) -> impl Iterator<Item = &SignalPoint> {
        self.points.iter().filter(|p| p.is_buy())
    }

    pub fn sell_points(&self) -> impl Iterator<Item = &SignalPoint> {
        self.points.iter().filter(|p| p.is_sell())
    }
}

pub fn validate_windows(short_window: usize, long_window: usize) -> Result<(), CrossoverError> {
    if short_window == 0 || long_window == 0 || short_window >= long_window {
        return Err(CrossoverError::InvalidWindow {
            short: short_window,
            long: long_window,
        });
    }
    Ok(())
}

pub fn generate(
    prices: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<SignalSeries, CrossoverError> {
    validate_windows(short_window, long_window)?;
    if prices.is_empty() {
        return Err(CrossoverError::EmptySeries);
    }

    let mut short = RollingMean::new(short_window);
    let mut long = RollingMean::new(long_window);
    let mut points: Vec<SignalPoint> = Vec::with_capacity(prices.len());

    for (i, point) in prices.points().iter().enumerate() {
        let short_mavg = short.push(point.price);
        let long_mavg = long.push(point.price);

        let signal = if i >= short_window && short_mavg > long_mavg {
            1.0
        } else {
            0.0
        };
        let position_change = points.last().map(|prev| signal - prev.signal);

        points.push(SignalPoint {
            date: point.date,
            price: point.price,
            short_mavg,
            long_mavg,
            signal,
            position_change,
        });
    }

    Ok(SignalSeries {
        short_window,
        long_window,
        points,
    })
}
