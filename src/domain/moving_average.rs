//! Trailing simple moving average with an expanding start.
//!
//! MEAN(n)[i] = sum(P[j] for j in max(0, i+1-n)..=i) / min(n, i+1)
//! No warmup: the first n-1 points average over all values seen so far.

use std::collections::VecDeque;

/// Sliding-window accumulator: keeps a compensated running sum and the
/// values currently inside the window.
///
/// A window whose values are all equal averages to exactly that value, so
/// constant stretches of different window lengths compare equal.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
    compensation: f64,
    run_value: f64,
    run_len: usize,
}

impl RollingMean {
    /// `window` must be non-zero.
    pub fn new(window: usize) -> Self {
        debug_assert!(window > 0, "rolling window must be non-zero");
        Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
            compensation: 0.0,
            run_value: 0.0,
            run_len: 0,
        }
    }

    /// Add the next value and return the mean of the current window.
    pub fn push(&mut self, value: f64) -> f64 {
        if self.values.len() == self.window {
            if let Some(oldest) = self.values.pop_front() {
                self.accumulate(-oldest);
            }
        }
        self.values.push_back(value);
        self.accumulate(value);

        if self.run_len > 0 && value == self.run_value {
            self.run_len = (self.run_len + 1).min(self.window);
        } else {
            self.run_value = value;
            self.run_len = 1;
        }
        if self.run_len == self.values.len() {
            return value;
        }

        (self.sum + self.compensation) / self.values.len() as f64
    }

    // Neumaier summation
    fn accumulate(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut acc = RollingMean::new(window);
    values.iter().map(|&v| acc.push(v)).collect()
}
