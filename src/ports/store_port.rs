//! Result storage port trait.
//!
//! Writes are idempotent per natural key so a rescan replaces rather than
//! duplicates: signals upsert on (ticker, date, signal_type), trades replace
//! wholesale per (ticker, strategy), summaries upsert on (ticker, strategy).

use crate::domain::backtest::{BacktestResult, Trade};
use crate::domain::error::MaplescanError;
use crate::domain::signal::SignalEvent;

pub trait StorePort {
    fn upsert_signals(&self, signals: &[SignalEvent]) -> Result<(), MaplescanError>;

    fn replace_trades(
        &self,
        ticker: &str,
        strategy: &str,
        trades: &[Trade],
    ) -> Result<(), MaplescanError>;

    /// Persist the summary metrics of one backtest (the trade list is stored
    /// separately via [`StorePort::replace_trades`]).
    fn upsert_performance(&self, result: &BacktestResult) -> Result<(), MaplescanError>;

    /// Most recent signals across all tickers, newest first.
    fn recent_signals(&self, limit: usize) -> Result<Vec<SignalEvent>, MaplescanError>;

    /// Stored performance summaries, optionally restricted to one ticker.
    /// Returned results carry no trade lists.
    fn performance_summaries(
        &self,
        ticker: Option<&str>,
    ) -> Result<Vec<BacktestResult>, MaplescanError>;
}
