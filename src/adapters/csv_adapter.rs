//! CSV file price data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv` with a header row containing at least
//! `date` (YYYY-MM-DD) and `close` columns, in any order and any case.

use crate::domain::error::CrossoverError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// All rows of the ticker's file, sorted by date.
    fn read_points(&self, ticker: &str) -> Result<Vec<PricePoint>, CrossoverError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| CrossoverError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| CrossoverError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let date_col = column_index(headers, "date").ok_or_else(|| CrossoverError::Data {
            reason: format!("missing date column in {}", path.display()),
        })?;
        let close_col = column_index(headers, "close").ok_or_else(|| CrossoverError::Data {
            reason: format!("missing close column in {}", path.display()),
        })?;

        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| CrossoverError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                CrossoverError::Data {
                    reason: format!("invalid date {:?} on row {}: {}", date_str, row + 1, e),
                }
            })?;

            let close_str = record.get(close_col).unwrap_or_default();
            let price: f64 = close_str.parse().map_err(|e| CrossoverError::Data {
                reason: format!("invalid close value {:?} on row {}: {}", close_str, row + 1, e),
            })?;

            points.push(PricePoint { date, price });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, CrossoverError> {
        let points: Vec<PricePoint> = self
            .read_points(ticker)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();

        if points.is_empty() {
            return Err(CrossoverError::NoData {
                ticker: ticker.to_string(),
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        PriceSeries::new(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrossoverError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CrossoverError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| CrossoverError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                symbols.push(ticker.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossoverError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }
        let points = self.read_points(ticker)?;
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, points.len()))),
            _ => Ok(None),
        }
    }
}
