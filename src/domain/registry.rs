//! Backtestable strategy catalogue.
//!
//! Each strategy pairs a display name with a signal function producing
//! aligned entry/exit flag series from an indicator feed. Unlike the event
//! detectors, a strategy whose columns are missing is an error: a backtest
//! over a feed that cannot evaluate its own strategy is meaningless.

use crate::domain::detect;
use crate::domain::error::MaplescanError;
use crate::domain::feed::IndicatorFrame;

pub type SignalFn =
    fn(&IndicatorFrame) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError>;

pub struct StrategyDef {
    pub name: &'static str,
    signals: SignalFn,
}

impl StrategyDef {
    /// Entry flags (long on `Some(true)`) and exit flags, both aligned with
    /// the frame's date index.
    pub fn signals(
        &self,
        frame: &IndicatorFrame,
    ) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
        (self.signals)(frame)
    }
}

fn ema_10_50(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    detect::ma_crossover::ema_cross_flags(frame, 10, 50)
}

fn ema_5_20(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    detect::ma_crossover::ema_cross_flags(frame, 5, 20)
}

static CATALOGUE: [StrategyDef; 11] = [
    StrategyDef { name: "EMA 10/50", signals: ema_10_50 },
    StrategyDef { name: "EMA 5/20", signals: ema_5_20 },
    StrategyDef { name: "RSI", signals: detect::rsi::rsi_threshold_flags },
    StrategyDef { name: "MACD", signals: detect::rsi::macd_cross_flags },
    StrategyDef { name: "VWAP", signals: detect::ma_crossover::vwap_cross_flags },
    StrategyDef { name: "Combined", signals: detect::combined::combined_flags },
    StrategyDef { name: "Bollinger Bands", signals: detect::bollinger::bollinger_flags },
    StrategyDef { name: "ATR Breakout", signals: detect::atr::atr_breakout_flags },
    StrategyDef { name: "ADX DI Cross", signals: detect::adx::adx_di_cross_flags },
    StrategyDef { name: "OBV Trend", signals: detect::obv::obv_trend_flags },
    StrategyDef { name: "Stochastic", signals: detect::stochastic::stochastic_cross_flags },
];

/// The fixed strategy catalogue, in presentation order.
pub fn all_strategies() -> &'static [StrategyDef] {
    &CATALOGUE
}

pub fn find(name: &str) -> Option<&'static StrategyDef> {
    CATALOGUE.iter().find(|s| s.name == name)
}
