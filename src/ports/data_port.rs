//! Price data access port trait.

use crate::domain::error::CrossoverError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `ticker` with dates in `[start_date, end_date]`.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, CrossoverError>;

    fn list_symbols(&self) -> Result<Vec<String>, CrossoverError>;

    /// First date, last date and row count, or `None` when there is no data.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossoverError>;
}
