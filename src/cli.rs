//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::domain::backtest::BacktestEngine;
use crate::domain::detect;
use crate::domain::error::MaplescanError;
use crate::domain::feed::IndicatorFrame;
use crate::domain::indicator;
use crate::domain::registry;
use crate::domain::universe::{parse_tickers, validate_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::store_port::StorePort;

#[derive(Parser, Debug)]
#[command(name = "maplescan", about = "Technical signal scanner and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import daily price bars from CSV files
    Import {
        #[arg(short, long)]
        config: PathBuf,
        /// A CSV file or a directory of {TICKER}.csv files
        path: PathBuf,
        /// Ticker for a single-file import (defaults to the file stem)
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Scan the universe: detect signals and backtest every strategy
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Scan a single ticker instead of the configured universe
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Show the most recent detected signals
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show stored backtest performance summaries
    Results {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Show stored data range for ticker(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Import {
            config,
            path,
            ticker,
        } => run_import(&config, &path, ticker.as_deref()),
        Command::Scan { config, ticker } => run_scan(&config, ticker.as_deref()),
        Command::Signals { config, limit } => run_signals(&config, limit),
        Command::Results { config, ticker } => run_results(&config, ticker.as_deref()),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MaplescanError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_store(config_path: &PathBuf) -> Result<(FileConfigAdapter, SqliteAdapter), ExitCode> {
    let adapter = load_config(config_path)?;
    let store = SqliteAdapter::from_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    store.initialize_schema().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok((adapter, store))
}

fn run_import(config_path: &PathBuf, path: &PathBuf, ticker: Option<&str>) -> ExitCode {
    let (_, store) = match open_store(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    let mut total = 0usize;
    if path.is_dir() {
        let csv = CsvAdapter::new(path.clone());
        let tickers = match csv.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        for ticker in &tickers {
            let bars = match csv.fetch_prices(ticker) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("warning: skipping {} ({})", ticker, e);
                    continue;
                }
            };
            if let Err(e) = store.insert_bars(&bars) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            eprintln!("  {}: {} bars imported", ticker, bars.len());
            total += bars.len();
        }
    } else {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ticker = ticker.map(str::to_string).unwrap_or(stem);
        if ticker.is_empty() {
            eprintln!("error: cannot infer ticker from {}", path.display());
            return ExitCode::from(2);
        }
        let bars = match CsvAdapter::read_file(path, &ticker.to_uppercase()) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        if let Err(e) = store.insert_bars(&bars) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("  {}: {} bars imported", ticker.to_uppercase(), bars.len());
        total = bars.len();
    }

    eprintln!("Imported {} bars", total);
    ExitCode::SUCCESS
}

fn resolve_tickers(
    override_ticker: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, ExitCode> {
    let raw = match override_ticker {
        Some(t) => t.to_string(),
        None => adapter.get_string("universe", "tickers").ok_or_else(|| {
            let err = MaplescanError::ConfigMissing {
                section: "universe".into(),
                key: "tickers".into(),
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })?,
    };
    parse_tickers(&raw).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(2)
    })
}

fn run_scan(config_path: &PathBuf, ticker: Option<&str>) -> ExitCode {
    // Stage 1: config and store
    eprintln!("Loading config from {}", config_path.display());
    let (adapter, store) = match open_store(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    // Stage 2: resolve and validate universe
    let tickers = match resolve_tickers(ticker, &adapter) {
        Ok(t) => t,
        Err(code) => return code,
    };
    eprintln!("Validating {} tickers...", tickers.len());
    let validation = match validate_universe(&store, tickers) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let engine = BacktestEngine::new(adapter.get_double("backtest", "initial_capital", 10_000.0));

    // Stage 3: per-ticker pipeline
    let mut signal_count = 0usize;
    for ticker in &validation.universe.tickers {
        let bars = match store.fetch_prices(ticker) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
        };

        let mut frame = IndicatorFrame::from_bars(&bars);
        indicator::enrich(&mut frame);

        let signals = detect::detect_all(&frame, ticker);
        if let Err(e) = store.upsert_signals(&signals) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("  {}: {} signals", ticker, signals.len());
        signal_count += signals.len();

        // One failed strategy never aborts the scan of the others.
        for strategy in registry::all_strategies() {
            let (entries, exits) = match strategy.signals(&frame) {
                Ok(pair) => pair,
                Err(e) => {
                    eprintln!("warning: {} on {}: {}", strategy.name, ticker, e);
                    continue;
                }
            };
            let result = engine.run(&frame, &entries, &exits, ticker, strategy.name);
            if let Err(e) = store.replace_trades(ticker, strategy.name, &result.trades) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            if let Err(e) = store.upsert_performance(&result) {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    eprintln!(
        "Scan complete: {} tickers, {} signals",
        validation.universe.count(),
        signal_count
    );
    ExitCode::SUCCESS
}

fn run_signals(config_path: &PathBuf, limit: usize) -> ExitCode {
    let (_, store) = match open_store(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    let signals = match store.recent_signals(limit) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if signals.is_empty() {
        println!("No signals stored. Run a scan first.");
        return ExitCode::SUCCESS;
    }

    for s in &signals {
        println!(
            "{}  {:10}  {:8}  {:>10.2}  {}",
            s.date, s.ticker, s.direction, s.price, s.signal_type
        );
    }
    ExitCode::SUCCESS
}

fn run_results(config_path: &PathBuf, ticker: Option<&str>) -> ExitCode {
    let (_, store) = match open_store(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    let summaries = match store.performance_summaries(ticker) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if summaries.is_empty() {
        println!("No backtest results stored. Run a scan first.");
        return ExitCode::SUCCESS;
    }

    for r in &summaries {
        let flag = if r.insufficient_data { " [insufficient data]" } else { "" };
        println!(
            "{:10}  {:16}  {:3} trades  {:5.1}% win  {:+7.2}% return  {:6.2}% dd  sharpe {:.2}{}",
            r.ticker,
            r.strategy,
            r.total_trades,
            r.win_rate,
            r.total_return_pct,
            r.max_drawdown_pct,
            r.sharpe_ratio,
            flag
        );
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, ticker: Option<&str>) -> ExitCode {
    let (_, store) = match open_store(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    let tickers = match ticker {
        Some(t) => vec![t.to_uppercase()],
        None => match store.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    if tickers.is_empty() {
        println!("No price data stored. Run an import first.");
        return ExitCode::SUCCESS;
    }

    for ticker in &tickers {
        match store.get_data_range(ticker) {
            Ok(Some((min, max, count))) => {
                println!("{:10}  {} to {}  {} bars", ticker, min, max, count);
            }
            Ok(None) => println!("{:10}  no data", ticker),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_scan_with_ticker() {
        let cli = Cli::try_parse_from(["maplescan", "scan", "-c", "scan.ini", "--ticker", "RY.TO"])
            .unwrap();
        match cli.command {
            Command::Scan { config, ticker } => {
                assert_eq!(config, PathBuf::from("scan.ini"));
                assert_eq!(ticker.as_deref(), Some("RY.TO"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_import_with_path() {
        let cli =
            Cli::try_parse_from(["maplescan", "import", "-c", "scan.ini", "data/"]).unwrap();
        match cli.command {
            Command::Import { path, ticker, .. } => {
                assert_eq!(path, PathBuf::from("data/"));
                assert!(ticker.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_signals_default_limit() {
        let cli = Cli::try_parse_from(["maplescan", "signals", "-c", "scan.ini"]).unwrap();
        match cli.command {
            Command::Signals { limit, .. } => assert_eq!(limit, 20),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["maplescan"]).is_err());
    }

    #[test]
    fn resolve_tickers_prefers_override() {
        let adapter =
            FileConfigAdapter::from_string("[universe]\ntickers = RY.TO, TD.TO\n").unwrap();
        let tickers = resolve_tickers(Some("enb.to"), &adapter).unwrap();
        assert_eq!(tickers, vec!["ENB.TO"]);
        let tickers = resolve_tickers(None, &adapter).unwrap();
        assert_eq!(tickers, vec!["RY.TO", "TD.TO"]);
    }
}
