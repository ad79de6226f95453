#![allow(dead_code)]

use chrono::NaiveDate;
use crossover::domain::backtest::BacktestConfig;
use crossover::domain::error::CrossoverError;
use crossover::domain::price::PriceSeries;
use crossover::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, ticker: &str, prices: PriceSeries) -> Self {
        self.data.insert(ticker.to_string(), prices);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<PriceSeries, CrossoverError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(CrossoverError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrossoverError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossoverError> {
        match self.data.get(ticker) {
            Some(series) => Ok(series
                .first_date()
                .zip(series.last_date())
                .map(|(first, last)| (first, last, series.len()))),
            None => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily prices starting 2020-01-01.
pub fn make_prices(values: &[f64]) -> PriceSeries {
    let start = date(2020, 1, 1);
    PriceSeries::from_pairs(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Duration::days(i as i64), v)),
    )
    .unwrap()
}

pub fn step_prices() -> PriceSeries {
    make_prices(&[10.0, 10.0, 10.0, 10.0, 10.0, 12.0, 12.0, 12.0, 12.0, 12.0])
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        ticker: "TEST".into(),
        start_date: date(2020, 1, 1),
        end_date: date(2020, 12, 31),
        initial_capital: 1000.0,
        trade_size: 100,
        short_window: 2,
        long_window: 4,
    }
}

/// CSV text with a `date,close` header for the given closes.
pub fn csv_content(values: &[f64]) -> String {
    let start = date(2020, 1, 1);
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for (i, v) in values.iter().enumerate() {
        let d = start + chrono::Duration::days(i as i64);
        out.push_str(&format!("{},{},{},{},{},1000\n", d, v, v, v, v));
    }
    out
}
