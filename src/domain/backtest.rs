//! Single-position long-only backtest over precomputed signal series.
//!
//! The simulation is a two-state scan: flat until an entry flag fires, long
//! until an exit flag fires, at most one open position, fills at that day's
//! close. Days where either signal is undefined are dropped before the scan
//! so warm-up rows never trade.

use chrono::NaiveDate;

use crate::domain::feed::IndicatorFrame;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
/// Fewer evaluable rows than this and the backtest is not simulated at all.
pub const MIN_BACKTEST_ROWS: usize = 10;
/// Fewer completed trades than this and the result is flagged advisory.
pub const MIN_TRADES: usize = 3;
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// One completed round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub ticker: String,
    pub strategy: String,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub return_pct: f64,
}

impl Trade {
    pub fn new(
        ticker: &str,
        strategy: &str,
        entry_date: NaiveDate,
        entry_price: f64,
        exit_date: NaiveDate,
        exit_price: f64,
    ) -> Self {
        Trade {
            ticker: ticker.to_string(),
            strategy: strategy.to_string(),
            entry_date,
            entry_price,
            exit_date,
            exit_price,
            return_pct: (exit_price - entry_price) / entry_price * 100.0,
        }
    }
}

/// Aggregate outcome of one ticker/strategy simulation. Percentages are in
/// percent units; `max_drawdown_pct` is zero or negative.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub ticker: String,
    pub strategy: String,
    pub total_trades: usize,
    pub win_rate: f64,
    pub avg_gain: f64,
    pub avg_loss: f64,
    pub risk_reward: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub buy_hold_return_pct: f64,
    pub insufficient_data: bool,
    pub trades: Vec<Trade>,
}

impl BacktestResult {
    fn insufficient(ticker: &str, strategy: &str) -> Self {
        BacktestResult {
            ticker: ticker.to_string(),
            strategy: strategy.to_string(),
            total_trades: 0,
            win_rate: 0.0,
            avg_gain: 0.0,
            avg_loss: 0.0,
            risk_reward: 0.0,
            total_return_pct: 0.0,
            max_drawdown_pct: 0.0,
            sharpe_ratio: 0.0,
            buy_hold_return_pct: 0.0,
            insufficient_data: true,
            trades: Vec::new(),
        }
    }
}

struct OpenPosition {
    entry_date: NaiveDate,
    entry_price: f64,
}

enum Position {
    Flat,
    Long(OpenPosition),
}

pub struct BacktestEngine {
    pub initial_capital: f64,
}

impl Default for BacktestEngine {
    fn default() -> Self {
        BacktestEngine {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
        }
    }
}

impl BacktestEngine {
    pub fn new(initial_capital: f64) -> Self {
        BacktestEngine { initial_capital }
    }

    /// Simulate one strategy over one instrument. `entries` and `exits` are
    /// flag series aligned with the frame's date index; rows where either is
    /// undefined do not participate. Never errors: degenerate input yields a
    /// result with `insufficient_data` set.
    pub fn run(
        &self,
        frame: &IndicatorFrame,
        entries: &[Option<bool>],
        exits: &[Option<bool>],
        ticker: &str,
        strategy: &str,
    ) -> BacktestResult {
        let dates = frame.dates();
        let close = frame.close();

        let n = frame.len().min(entries.len()).min(exits.len());
        let rows: Vec<(NaiveDate, f64, bool, bool)> = (0..n)
            .filter_map(|i| match (entries[i], exits[i]) {
                (Some(enter), Some(exit)) => Some((dates[i], close[i], enter, exit)),
                _ => None,
            })
            .collect();

        if rows.len() < MIN_BACKTEST_ROWS {
            return BacktestResult::insufficient(ticker, strategy);
        }

        let mut position = Position::Flat;
        let mut trades: Vec<Trade> = Vec::new();
        for &(date, price, enter, exit) in &rows {
            position = match position {
                Position::Flat if enter => Position::Long(OpenPosition {
                    entry_date: date,
                    entry_price: price,
                }),
                Position::Long(open) if exit => {
                    trades.push(Trade::new(
                        ticker,
                        strategy,
                        open.entry_date,
                        open.entry_price,
                        date,
                        price,
                    ));
                    Position::Flat
                }
                other => other,
            };
        }
        if let Position::Long(open) = position {
            if let Some(&(date, price, _, _)) = rows.last() {
                trades.push(Trade::new(
                    ticker,
                    strategy,
                    open.entry_date,
                    open.entry_price,
                    date,
                    price,
                ));
            }
        }

        let buy_hold_return_pct = if rows.len() >= 2 {
            let first = rows[0].1;
            let last = rows[rows.len() - 1].1;
            (last - first) / first * 100.0
        } else {
            0.0
        };

        if trades.is_empty() {
            return BacktestResult {
                buy_hold_return_pct,
                ..BacktestResult::insufficient(ticker, strategy)
            };
        }

        let returns: Vec<f64> = trades.iter().map(|t| t.return_pct).collect();
        let total_trades = trades.len();

        let wins = returns.iter().filter(|r| **r > 0.0).count();
        let win_rate = wins as f64 / total_trades as f64 * 100.0;

        let gains: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
        let losses: Vec<f64> = returns.iter().copied().filter(|r| *r <= 0.0).collect();
        let avg_gain = mean(&gains).unwrap_or(0.0);
        let avg_loss = mean(&losses).unwrap_or(0.0);
        let risk_reward = if avg_loss == 0.0 {
            f64::INFINITY
        } else {
            (avg_gain / avg_loss).abs()
        };

        let mut capital = self.initial_capital;
        let mut peak = capital;
        let mut max_drawdown_pct = 0.0;
        for r in &returns {
            capital *= 1.0 + r / 100.0;
            if capital > peak {
                peak = capital;
            }
            let drawdown = (capital - peak) / peak * 100.0;
            if drawdown < max_drawdown_pct {
                max_drawdown_pct = drawdown;
            }
        }
        let total_return_pct = (capital - self.initial_capital) / self.initial_capital * 100.0;

        let sharpe_ratio = if total_trades >= 2 {
            sharpe(&returns, rows.len(), total_trades)
        } else {
            0.0
        };

        BacktestResult {
            ticker: ticker.to_string(),
            strategy: strategy.to_string(),
            total_trades,
            win_rate,
            avg_gain,
            avg_loss,
            risk_reward,
            total_return_pct,
            max_drawdown_pct,
            sharpe_ratio,
            buy_hold_return_pct,
            insufficient_data: total_trades < MIN_TRADES,
            trades,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Per-trade Sharpe annualized by trade frequency: with `rows` evaluable days
/// and `trades` round trips, one trade spans rows/trades days on average, so
/// there are 252/(rows/trades) trades per year.
fn sharpe(returns_pct: &[f64], rows: usize, trades: usize) -> f64 {
    let fractional: Vec<f64> = returns_pct.iter().map(|r| r / 100.0).collect();
    let n = fractional.len() as f64;
    let mean = fractional.iter().sum::<f64>() / n;
    let var = fractional.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = var.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    let days_per_trade = (rows as f64 / trades as f64).max(1.0);
    mean / std * (TRADING_DAYS_PER_YEAR / days_per_trade).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detect::tests::bars_from_closes;
    use approx::assert_relative_eq;

    fn frame_from_closes(closes: &[f64]) -> IndicatorFrame {
        IndicatorFrame::from_bars(&bars_from_closes(closes))
    }

    fn flags(len: usize, fire_at: &[usize]) -> Vec<Option<bool>> {
        (0..len).map(|i| Some(fire_at.contains(&i))).collect()
    }

    fn never(len: usize) -> Vec<Option<bool>> {
        vec![Some(false); len]
    }

    #[test]
    fn too_few_rows_is_insufficient() {
        let frame = frame_from_closes(&[100.0; 5]);
        let result = BacktestEngine::default().run(
            &frame,
            &flags(5, &[1]),
            &never(5),
            "T",
            "MACD",
        );
        assert!(result.insufficient_data);
        assert_eq!(result.total_trades, 0);
        assert_relative_eq!(result.total_return_pct, 0.0);
        assert_relative_eq!(result.buy_hold_return_pct, 0.0);
    }

    #[test]
    fn undefined_rows_are_dropped_before_counting() {
        // 12 raw rows but only 8 evaluable: below the simulation floor.
        let frame = frame_from_closes(&[100.0; 12]);
        let mut entries = flags(12, &[]);
        entries[0] = None;
        entries[1] = None;
        entries[2] = None;
        entries[3] = None;
        let result =
            BacktestEngine::default().run(&frame, &entries, &never(12), "T", "MACD");
        assert!(result.insufficient_data);
        assert_eq!(result.total_trades, 0);
    }

    #[test]
    fn single_round_trip() {
        let mut closes = vec![100.0; 12];
        closes[5] = 110.0;
        let frame = frame_from_closes(&closes);
        let result = BacktestEngine::default().run(
            &frame,
            &flags(12, &[0]),
            &flags(12, &[5]),
            "T",
            "MACD",
        );
        assert_eq!(result.total_trades, 1);
        assert_relative_eq!(result.trades[0].return_pct, 10.0);
        assert_relative_eq!(result.total_return_pct, 10.0);
        assert_relative_eq!(result.win_rate, 100.0);
        assert_relative_eq!(result.sharpe_ratio, 0.0); // needs two trades
        assert!(result.insufficient_data); // advisory below three trades
    }

    #[test]
    fn open_position_force_closes_at_final_row() {
        let mut closes = vec![100.0; 12];
        closes[11] = 120.0;
        let frame = frame_from_closes(&closes);
        let result = BacktestEngine::default().run(
            &frame,
            &flags(12, &[3]),
            &never(12),
            "T",
            "MACD",
        );
        assert_eq!(result.total_trades, 1);
        assert_relative_eq!(result.trades[0].return_pct, 20.0);
        assert_eq!(result.trades[0].exit_date, frame.dates()[11]);
    }

    #[test]
    fn no_pyramiding_while_long() {
        let mut closes = vec![100.0; 14];
        closes[8] = 110.0;
        let frame = frame_from_closes(&closes);
        // Second entry at index 4 lands while the first is still open.
        let result = BacktestEngine::default().run(
            &frame,
            &flags(14, &[2, 4]),
            &flags(14, &[8]),
            "T",
            "MACD",
        );
        assert_eq!(result.total_trades, 1);
        assert_relative_eq!(result.trades[0].entry_price, 100.0);
    }

    #[test]
    fn returns_compound_multiplicatively() {
        // +10%, then -9.0909..%, then +5%: capital 10000 -> 11000 -> 10000
        // -> 10500.
        let closes = vec![
            100.0, 110.0, // trade 1
            110.0, 100.0, // trade 2
            100.0, 105.0, // trade 3
            105.0, 105.0, 105.0, 105.0, 105.0, 105.0,
        ];
        let frame = frame_from_closes(&closes);
        let result = BacktestEngine::default().run(
            &frame,
            &flags(12, &[0, 2, 4]),
            &flags(12, &[1, 3, 5]),
            "T",
            "MACD",
        );
        assert_eq!(result.total_trades, 3);
        assert!(!result.insufficient_data);
        assert_relative_eq!(result.total_return_pct, 5.0, epsilon = 1e-9);
        // Trough after trade 2 sits 9.0909..% under the 11000 peak.
        assert_relative_eq!(
            result.max_drawdown_pct,
            (10_000.0 - 11_000.0) / 11_000.0 * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn buy_hold_ignores_trading_activity() {
        let mut closes = vec![100.0; 12];
        closes[11] = 150.0;
        let frame = frame_from_closes(&closes);
        let result =
            BacktestEngine::default().run(&frame, &never(12), &never(12), "T", "MACD");
        assert_eq!(result.total_trades, 0);
        assert!(result.insufficient_data);
        assert_relative_eq!(result.buy_hold_return_pct, 50.0);
    }

    #[test]
    fn identical_returns_zero_sharpe() {
        let closes = vec![
            100.0, 110.0, 100.0, 110.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0,
        ];
        let frame = frame_from_closes(&closes);
        let result = BacktestEngine::default().run(
            &frame,
            &flags(12, &[0, 2]),
            &flags(12, &[1, 3]),
            "T",
            "MACD",
        );
        assert_eq!(result.total_trades, 2);
        assert_relative_eq!(result.sharpe_ratio, 0.0);
    }

    #[test]
    fn all_losing_trades_risk_reward_zero_gain() {
        let closes = vec![
            110.0, 100.0, 110.0, 99.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0,
        ];
        let frame = frame_from_closes(&closes);
        let result = BacktestEngine::default().run(
            &frame,
            &flags(12, &[0, 2]),
            &flags(12, &[1, 3]),
            "T",
            "MACD",
        );
        assert_relative_eq!(result.win_rate, 0.0);
        assert_relative_eq!(result.avg_gain, 0.0);
        assert!(result.avg_loss < 0.0);
        assert_relative_eq!(result.risk_reward, 0.0);
        assert!(result.max_drawdown_pct < 0.0);
    }

    #[test]
    fn all_winning_trades_infinite_risk_reward() {
        let closes = vec![
            100.0, 110.0, 100.0, 112.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0,
        ];
        let frame = frame_from_closes(&closes);
        let result = BacktestEngine::default().run(
            &frame,
            &flags(12, &[0, 2]),
            &flags(12, &[1, 3]),
            "T",
            "MACD",
        );
        assert_relative_eq!(result.win_rate, 100.0);
        assert!(result.risk_reward.is_infinite());
        assert_relative_eq!(result.max_drawdown_pct, 0.0);
    }

    #[test]
    fn trade_return_is_percent_of_entry() {
        let trade = Trade::new(
            "RY.TO",
            "MACD",
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            80.0,
            chrono::NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            100.0,
        );
        assert_relative_eq!(trade.return_pct, 25.0);
    }
}
