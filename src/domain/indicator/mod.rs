//! Technical indicator calculations.
//!
//! Each indicator is an explicit scan over the raw OHLCV arrays producing an
//! optional series aligned with the feed's date index. [`enrich`] attaches
//! the full standard column set to a frame in one pass.

pub mod ema;
pub mod rsi;
pub mod macd;
pub mod vwap;
pub mod atr;
pub mod bollinger;
pub mod adx;
pub mod obv;
pub mod stochastic;

use crate::domain::feed::{Column, IndicatorFrame};

pub const EMA_PERIODS: [usize; 5] = [5, 10, 20, 50, 200];
pub const SMA_PERIODS: [usize; 2] = [50, 200];
pub const RSI_PERIODS: [usize; 2] = [14, 21];
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const VWAP_LOOKBACK: usize = 20;
pub const ATR_PERIOD: usize = 14;
pub const BB_PERIOD: usize = 20;
pub const BB_STD: f64 = 2.0;
pub const ADX_PERIOD: usize = 14;
pub const STOCH_K_PERIOD: usize = 14;
pub const STOCH_D_PERIOD: usize = 3;

/// Compute every standard indicator column and attach it to the frame.
pub fn enrich(frame: &mut IndicatorFrame) {
    let close = frame.close().to_vec();
    let high = frame.high().to_vec();
    let low = frame.low().to_vec();
    let volume = frame.volume().to_vec();

    for period in EMA_PERIODS {
        frame.insert_column(Column::Ema(period), ema::ema(&close, period));
    }
    for period in SMA_PERIODS {
        frame.insert_column(Column::Sma(period), ema::sma(&close, period));
    }
    for period in RSI_PERIODS {
        frame.insert_column(Column::Rsi(period), rsi::rsi(&close, period));
    }

    let (line, signal, histogram) = macd::macd(&close, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    frame.insert_column(Column::Macd, line);
    frame.insert_column(Column::MacdSignal, signal);
    frame.insert_column(Column::MacdHistogram, histogram);

    frame.insert_column(
        Column::Vwap(VWAP_LOOKBACK),
        vwap::vwap(&high, &low, &close, &volume, VWAP_LOOKBACK),
    );
    frame.insert_column(
        Column::Atr(ATR_PERIOD),
        atr::atr(&high, &low, &close, ATR_PERIOD),
    );

    let bands = bollinger::bollinger(&close, BB_PERIOD, BB_STD);
    frame.insert_column(Column::BbUpper, bands.upper);
    frame.insert_column(Column::BbMiddle, bands.middle);
    frame.insert_column(Column::BbLower, bands.lower);
    frame.insert_column(Column::BbWidth, bands.width);

    let (plus_di, minus_di, adx) = adx::adx(&high, &low, &close, ADX_PERIOD);
    frame.insert_column(Column::PlusDi, plus_di);
    frame.insert_column(Column::MinusDi, minus_di);
    frame.insert_column(Column::Adx(ADX_PERIOD), adx);

    frame.insert_column(Column::Obv, obv::obv(&close, &volume));

    let (k, d) = stochastic::stochastic(&high, &low, &close, STOCH_K_PERIOD, STOCH_D_PERIOD);
    frame.insert_column(Column::StochK, k);
    frame.insert_column(Column::StochD, d);
}
