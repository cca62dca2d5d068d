//! Per-instrument position state.

use chrono::NaiveDate;

use crate::domain::params::SignalParams;

/// An open long position. All four fields are set together at entry;
/// only `trailing_stop_price` moves afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    pub trailing_stop_price: f64,
}

impl OpenPosition {
    pub fn open(date: NaiveDate, close: f64, atr: f64, params: &SignalParams) -> Self {
        OpenPosition {
            entry_date: date,
            entry_price: close,
            stop_loss_price: close - params.atr_multiplier * atr,
            trailing_stop_price: close - params.trailing_atr_multiplier * atr,
        }
    }

    /// Calendar days since entry.
    pub fn holding_days(&self, date: NaiveDate) -> i64 {
        (date - self.entry_date).num_days()
    }

    /// Raise the trailing stop to `close - multiplier * atr` when price is
    /// above entry. Never lowers it.
    pub fn ratchet(&mut self, close: f64, atr: f64, multiplier: f64) {
        if close > self.entry_price {
            self.trailing_stop_price = self.trailing_stop_price.max(close - multiplier * atr);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(OpenPosition),
}

impl PositionState {
    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long(_))
    }

    pub fn position(&self) -> Option<&OpenPosition> {
        match self {
            PositionState::Long(pos) => Some(pos),
            PositionState::Flat => None,
        }
    }
}
