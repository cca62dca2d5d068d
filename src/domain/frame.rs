//! Per-date indicator frames aligned with an instrument's price bars.

use chrono::NaiveDate;

use crate::domain::indicator::{calculate_atr, calculate_ema, calculate_macd, calculate_rsi};
use crate::domain::ohlcv::PriceBar;
use crate::domain::params::SignalParams;

/// Indicator values for one date. `None` means the indicator is still
/// warming up on that date.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub date: NaiveDate,
    pub rsi: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub atr: Option<f64>,
}

/// All five values of a fully defined frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryInputs {
    pub rsi: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub macd_histogram: f64,
    pub atr: f64,
}

impl IndicatorFrame {
    /// A frame with every indicator undefined.
    pub fn undefined(date: NaiveDate) -> Self {
        IndicatorFrame {
            date,
            rsi: None,
            ema_short: None,
            ema_long: None,
            macd_histogram: None,
            atr: None,
        }
    }

    pub fn entry_inputs(&self) -> Option<EntryInputs> {
        Some(EntryInputs {
            rsi: self.rsi?,
            ema_short: self.ema_short?,
            ema_long: self.ema_long?,
            macd_histogram: self.macd_histogram?,
            atr: self.atr?,
        })
    }
}

/// Run the built-in indicators over `bars` and zip them into frames.
/// The result always has one frame per bar.
pub fn compute_frames(bars: &[PriceBar], params: &SignalParams) -> Vec<IndicatorFrame> {
    let rsi = calculate_rsi(bars, params.rsi_window);
    let ema_short = calculate_ema(bars, params.ema_short_period);
    let ema_long = calculate_ema(bars, params.ema_long_period);
    let macd = calculate_macd(bars, params.macd_fast, params.macd_slow, params.macd_signal);
    let atr = calculate_atr(bars, params.atr_window);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorFrame {
            date: bar.date,
            rsi: rsi.simple_at(i),
            ema_short: ema_short.simple_at(i),
            ema_long: ema_long.simple_at(i),
            macd_histogram: macd.histogram_at(i),
            atr: atr.simple_at(i),
        })
        .collect()
}
