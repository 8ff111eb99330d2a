//! SQLite storage adapter.
//!
//! Owns the scanner's four tables: raw daily bars, detected signals,
//! per-trade backtest fills and per-strategy performance summaries. All
//! writes are keyed so a rescan replaces prior output for the same
//! ticker/strategy instead of accumulating duplicates.

use crate::domain::backtest::{BacktestResult, Trade};
use crate::domain::error::MaplescanError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{Direction, SignalEvent};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::store_port::StorePort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

const DATE_FMT: &str = "%Y-%m-%d";

fn pool_err(e: r2d2::Error) -> MaplescanError {
    MaplescanError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> MaplescanError {
    MaplescanError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(s.len(), rusqlite::types::Type::Text, Box::new(e))
    })
}

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MaplescanError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| MaplescanError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, MaplescanError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(pool_err)?;
        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), MaplescanError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS stock_prices (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (ticker, date)
            );
            CREATE INDEX IF NOT EXISTS idx_prices_ticker ON stock_prices(ticker);
            CREATE TABLE IF NOT EXISTS signals (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                signal_type TEXT NOT NULL,
                direction TEXT NOT NULL,
                price REAL NOT NULL,
                strategy TEXT NOT NULL,
                PRIMARY KEY (ticker, date, signal_type)
            );
            CREATE INDEX IF NOT EXISTS idx_signals_date ON signals(date);
            CREATE TABLE IF NOT EXISTS backtest_trades (
                ticker TEXT NOT NULL,
                strategy TEXT NOT NULL,
                entry_date TEXT NOT NULL,
                entry_price REAL NOT NULL,
                exit_date TEXT NOT NULL,
                exit_price REAL NOT NULL,
                return_pct REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_trades_ticker_strategy
                ON backtest_trades(ticker, strategy);
            CREATE TABLE IF NOT EXISTS performance_summary (
                ticker TEXT NOT NULL,
                strategy TEXT NOT NULL,
                total_trades INTEGER NOT NULL,
                win_rate REAL NOT NULL,
                avg_gain REAL NOT NULL,
                avg_loss REAL NOT NULL,
                risk_reward REAL NOT NULL,
                total_return_pct REAL NOT NULL,
                max_drawdown_pct REAL NOT NULL,
                sharpe_ratio REAL NOT NULL,
                buy_hold_return_pct REAL NOT NULL,
                insufficient_data INTEGER NOT NULL,
                PRIMARY KEY (ticker, strategy)
            );",
        )
        .map_err(query_err)?;

        Ok(())
    }

    pub fn insert_bars(&self, bars: &[PriceBar]) -> Result<(), MaplescanError> {
        let mut conn = self.pool.get().map_err(pool_err)?;
        let tx = conn.transaction().map_err(query_err)?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO stock_prices
                    (ticker, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    bar.ticker,
                    bar.date.format(DATE_FMT).to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(())
    }
}

impl DataPort for SqliteAdapter {
    fn fetch_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, MaplescanError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT ticker, date, open, high, low, close, volume
                 FROM stock_prices
                 WHERE ticker = ?1
                 ORDER BY date ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![ticker], |row| {
                let date_str: String = row.get(1)?;
                Ok(PriceBar {
                    ticker: row.get(0)?,
                    date: parse_date(&date_str)?,
                    open: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    close: row.get(5)?,
                    volume: row.get(6)?,
                })
            })
            .map_err(query_err)?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(row.map_err(query_err)?);
        }
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, MaplescanError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let mut stmt = conn
            .prepare("SELECT DISTINCT ticker FROM stock_prices ORDER BY ticker")
            .map_err(query_err)?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(query_err)?;

        let mut tickers = Vec::new();
        for row in rows {
            tickers.push(row.map_err(query_err)?);
        }
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MaplescanError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM stock_prices WHERE ticker = ?1",
                params![ticker],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_err)?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = NaiveDate::parse_from_str(&min_str, DATE_FMT).map_err(|e| {
                    MaplescanError::Database {
                        reason: e.to_string(),
                    }
                })?;
                let max = NaiveDate::parse_from_str(&max_str, DATE_FMT).map_err(|e| {
                    MaplescanError::Database {
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}

impl StorePort for SqliteAdapter {
    fn upsert_signals(&self, signals: &[SignalEvent]) -> Result<(), MaplescanError> {
        let mut conn = self.pool.get().map_err(pool_err)?;
        let tx = conn.transaction().map_err(query_err)?;

        for signal in signals {
            tx.execute(
                "INSERT OR REPLACE INTO signals
                    (ticker, date, signal_type, direction, price, strategy)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    signal.ticker,
                    signal.date.format(DATE_FMT).to_string(),
                    signal.signal_type,
                    signal.direction.to_string(),
                    signal.price,
                    signal.strategy
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(())
    }

    fn replace_trades(
        &self,
        ticker: &str,
        strategy: &str,
        trades: &[Trade],
    ) -> Result<(), MaplescanError> {
        let mut conn = self.pool.get().map_err(pool_err)?;
        let tx = conn.transaction().map_err(query_err)?;

        tx.execute(
            "DELETE FROM backtest_trades WHERE ticker = ?1 AND strategy = ?2",
            params![ticker, strategy],
        )
        .map_err(query_err)?;

        for trade in trades {
            tx.execute(
                "INSERT INTO backtest_trades
                    (ticker, strategy, entry_date, entry_price, exit_date, exit_price, return_pct)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    trade.ticker,
                    trade.strategy,
                    trade.entry_date.format(DATE_FMT).to_string(),
                    trade.entry_price,
                    trade.exit_date.format(DATE_FMT).to_string(),
                    trade.exit_price,
                    trade.return_pct
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(())
    }

    fn upsert_performance(&self, result: &BacktestResult) -> Result<(), MaplescanError> {
        let conn = self.pool.get().map_err(pool_err)?;

        conn.execute(
            "INSERT OR REPLACE INTO performance_summary
                (ticker, strategy, total_trades, win_rate, avg_gain, avg_loss, risk_reward,
                 total_return_pct, max_drawdown_pct, sharpe_ratio, buy_hold_return_pct,
                 insufficient_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                result.ticker,
                result.strategy,
                result.total_trades as i64,
                result.win_rate,
                result.avg_gain,
                result.avg_loss,
                result.risk_reward,
                result.total_return_pct,
                result.max_drawdown_pct,
                result.sharpe_ratio,
                result.buy_hold_return_pct,
                result.insufficient_data as i64
            ],
        )
        .map_err(query_err)?;

        Ok(())
    }

    fn recent_signals(&self, limit: usize) -> Result<Vec<SignalEvent>, MaplescanError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT ticker, date, signal_type, direction, price, strategy
                 FROM signals
                 ORDER BY date DESC, ticker ASC
                 LIMIT ?1",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let date_str: String = row.get(1)?;
                let direction_str: String = row.get(3)?;
                let direction = direction_str.parse::<Direction>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        e.into(),
                    )
                })?;
                Ok(SignalEvent {
                    ticker: row.get(0)?,
                    date: parse_date(&date_str)?,
                    signal_type: row.get(2)?,
                    direction,
                    price: row.get(4)?,
                    strategy: row.get(5)?,
                })
            })
            .map_err(query_err)?;

        let mut signals = Vec::new();
        for row in rows {
            signals.push(row.map_err(query_err)?);
        }
        Ok(signals)
    }

    fn performance_summaries(
        &self,
        ticker: Option<&str>,
    ) -> Result<Vec<BacktestResult>, MaplescanError> {
        let conn = self.pool.get().map_err(pool_err)?;

        let base = "SELECT ticker, strategy, total_trades, win_rate, avg_gain, avg_loss,
                    risk_reward, total_return_pct, max_drawdown_pct, sharpe_ratio,
                    buy_hold_return_pct, insufficient_data
                    FROM performance_summary";

        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<BacktestResult> {
            let total_trades: i64 = row.get(2)?;
            let insufficient: i64 = row.get(11)?;
            Ok(BacktestResult {
                ticker: row.get(0)?,
                strategy: row.get(1)?,
                total_trades: total_trades as usize,
                win_rate: row.get(3)?,
                avg_gain: row.get(4)?,
                avg_loss: row.get(5)?,
                risk_reward: row.get(6)?,
                total_return_pct: row.get(7)?,
                max_drawdown_pct: row.get(8)?,
                sharpe_ratio: row.get(9)?,
                buy_hold_return_pct: row.get(10)?,
                insufficient_data: insufficient != 0,
                trades: Vec::new(),
            })
        };

        let mut results = Vec::new();
        match ticker {
            Some(t) => {
                let sql = format!("{} WHERE ticker = ?1 ORDER BY strategy", base);
                let mut stmt = conn.prepare(&sql).map_err(query_err)?;
                let rows = stmt.query_map(params![t], map_row).map_err(query_err)?;
                for row in rows {
                    results.push(row.map_err(query_err)?);
                }
            }
            None => {
                let sql = format!("{} ORDER BY ticker, strategy", base);
                let mut stmt = conn.prepare(&sql).map_err(query_err)?;
                let rows = stmt.query_map([], map_row).map_err(query_err)?;
                for row in rows {
                    results.push(row.map_err(query_err)?);
                }
            }
        }
        Ok(results)
    }
}
