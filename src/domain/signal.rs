//! Signal events emitted by the engine.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignalKind {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL_TIME_STOP")]
    SellTimeStop,
    #[serde(rename = "SELL_ATR_STOP")]
    SellAtrStop,
    #[serde(rename = "SELL_TRAILING_STOP")]
    SellTrailingStop,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalKind::Buy => "BUY",
            SignalKind::SellTimeStop => "SELL (time stop)",
            SignalKind::SellAtrStop => "SELL (ATR stop)",
            SignalKind::SellTrailingStop => "SELL (trailing stop)",
        };
        // pad() so width specifiers like {:20} apply
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub code: String,
    pub kind: SignalKind,
    pub price: f64,
}
