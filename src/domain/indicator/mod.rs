//! Built-in technical indicators.
//!
//! Every calculator returns an `IndicatorSeries` aligned 1:1 with its input
//! bars. Warm-up points carry `valid: false`; callers read values through
//! [`IndicatorPoint::simple`] / [`IndicatorPoint::histogram`], which map
//! invalid or non-finite points to `None`.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;

use chrono::NaiveDate;
use std::fmt;

use crate::domain::ohlcv::PriceBar;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    pub fn simple(&self) -> Option<f64> {
        match self.value {
            IndicatorValue::Simple(v) if self.valid && v.is_finite() => Some(v),
            _ => None,
        }
    }

    pub fn histogram(&self) -> Option<f64> {
        match self.value {
            IndicatorValue::Macd { histogram } if self.valid && histogram.is_finite() => {
                Some(histogram)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd { histogram: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Simple value at bar index `i`, `None` when out of range or undefined.
    pub fn simple_at(&self, i: usize) -> Option<f64> {
        self.values.get(i).and_then(IndicatorPoint::simple)
    }

    pub fn histogram_at(&self, i: usize) -> Option<f64> {
        self.values.get(i).and_then(IndicatorPoint::histogram)
    }
}

/// Wrap raw per-bar values as a simple series; `None` becomes an invalid point.
pub(crate) fn simple_series(bars: &[PriceBar], raw: Vec<Option<f64>>) -> IndicatorSeries {
    let values = bars
        .iter()
        .zip(raw)
        .map(|(bar, v)| IndicatorPoint {
            date: bar.date,
            valid: v.is_some(),
            value: IndicatorValue::Simple(v.unwrap_or(0.0)),
        })
        .collect();
    IndicatorSeries { values }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}
