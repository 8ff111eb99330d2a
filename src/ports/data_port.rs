//! Price data access port trait.

use crate::domain::error::MaplescanError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// All stored bars for one ticker in ascending date order.
    fn fetch_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, MaplescanError>;

    fn list_tickers(&self) -> Result<Vec<String>, MaplescanError>;

    /// First date, last date and bar count, or None when nothing is stored.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MaplescanError>;
}
