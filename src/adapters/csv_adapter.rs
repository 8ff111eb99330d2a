//! CSV file data adapter.
//!
//! Reads one `{TICKER}.csv` per ticker from a base directory, with a
//! `date,open,high,low,close,volume` header row and ISO dates. Used both as
//! a standalone [`DataPort`] and as the parser behind the import command.

use crate::domain::error::MaplescanError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

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

    /// Parse one CSV file into bars for the given ticker, sorted by date.
    pub fn read_file(path: &Path, ticker: &str) -> Result<Vec<PriceBar>, MaplescanError> {
        let content = fs::read_to_string(path).map_err(|e| MaplescanError::Database {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| MaplescanError::Database {
                reason: format!("CSV parse error: {}", e),
            })?;

            let field = |i: usize, name: &str| -> Result<&str, MaplescanError> {
                record.get(i).ok_or_else(|| MaplescanError::Database {
                    reason: format!("missing {} column", name),
                })
            };

            let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d").map_err(|e| {
                MaplescanError::Database {
                    reason: format!("invalid date format: {}", e),
                }
            })?;
            let open: f64 = field(1, "open")?
                .parse()
                .map_err(|e| MaplescanError::Database {
                    reason: format!("invalid open value: {}", e),
                })?;
            let high: f64 = field(2, "high")?
                .parse()
                .map_err(|e| MaplescanError::Database {
                    reason: format!("invalid high value: {}", e),
                })?;
            let low: f64 = field(3, "low")?
                .parse()
                .map_err(|e| MaplescanError::Database {
                    reason: format!("invalid low value: {}", e),
                })?;
            let close: f64 = field(4, "close")?
                .parse()
                .map_err(|e| MaplescanError::Database {
                    reason: format!("invalid close value: {}", e),
                })?;
            let volume: i64 = field(5, "volume")?
                .parse()
                .map_err(|e| MaplescanError::Database {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(PriceBar {
                ticker: ticker.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, MaplescanError> {
        Self::read_file(&self.csv_path(ticker), ticker)
    }

    fn list_tickers(&self) -> Result<Vec<String>, MaplescanError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| MaplescanError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MaplescanError::Database {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MaplescanError> {
        let bars = self.fetch_prices(ticker)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";

        fs::write(path.join("RY.TO.csv"), csv_content).unwrap();
        fs::write(path.join("TD.TO.csv"), "date,open,high,low,close,volume\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_prices_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_prices("RY.TO").unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(bars[0].ticker, "RY.TO");
    }

    #[test]
    fn fetch_prices_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_prices("XYZ.TO").is_err());
    }

    #[test]
    fn list_tickers_finds_csv_files() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_tickers().unwrap(), vec!["RY.TO", "TD.TO"]);
    }

    #[test]
    fn data_range_covers_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let (min, max, count) = adapter.get_data_range("RY.TO").unwrap().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(count, 3);
    }

    #[test]
    fn data_range_none_for_empty_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.get_data_range("TD.TO").unwrap().is_none());
    }
}
