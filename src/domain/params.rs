//! Signal-generation parameters.

use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};

/// Indicator periods and entry/exit thresholds for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub rsi_window: usize,
    pub atr_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_buy_bot: f64,
    pub rsi_buy_top: f64,
    pub atr_multiplier: f64,
    pub trailing_atr_multiplier: f64,
    pub max_holding_days: i64,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            ema_short_period: 12,
            ema_long_period: 26,
            rsi_window: 14,
            atr_window: 14,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
            rsi_buy_bot: 50.0,
            rsi_buy_top: 80.0,
            atr_multiplier: 2.0,
            trailing_atr_multiplier: 1.5,
            max_holding_days: 10,
        }
    }
}

impl SignalParams {
    /// Shortest history an instrument needs before it is scanned at all.
    pub fn min_history(&self) -> usize {
        self.ema_long_period
            .max(self.macd_slow)
            .max(self.rsi_window)
            .max(self.atr_window)
    }

    pub fn rsi_in_band(&self, rsi: f64) -> bool {
        (self.rsi_buy_bot..=self.rsi_buy_top).contains(&rsi)
    }

    /// The indicators every frame carries, in frame field order.
    pub fn indicators(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Rsi(self.rsi_window),
            IndicatorType::Ema(self.ema_short_period),
            IndicatorType::Ema(self.ema_long_period),
            IndicatorType::Macd {
                fast: self.macd_fast,
                slow: self.macd_slow,
                signal: self.macd_signal,
            },
            IndicatorType::Atr(self.atr_window),
        ]
    }
}
