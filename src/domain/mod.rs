//! Core domain types and logic.

pub mod ohlcv;
pub mod feed;
pub mod series;
pub mod indicator;
pub mod signal;
pub mod detect;
pub mod registry;
pub mod backtest;
pub mod universe;
pub mod error;
