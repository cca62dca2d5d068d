#![allow(dead_code)]

use chrono::NaiveDate;
pub use signalscan::domain::frame::IndicatorFrame;
pub use signalscan::domain::ohlcv::PriceBar;
use signalscan::domain::error::SignalError;
use signalscan::domain::scan::ScanConfig;
use signalscan::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SignalError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SignalError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(code) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
    }
}

/// One bar per calendar day starting at `start_date`, one per close.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
        })
        .collect()
}

/// A linear series rising by `step` per day.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64, step: f64) -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + step * i as f64).collect();
    bars_from_closes(start_date, &closes)
}

/// Forty days of decline followed by a steady rally: every indicator warms
/// up on the decline and the rally triggers an entry.
pub fn dip_then_rally() -> Vec<PriceBar> {
    let mut closes: Vec<f64> = (0..40).map(|i| 140.0 - i as f64).collect();
    closes.extend((1..=30).map(|i| 101.0 + 1.5 * i as f64 + if i % 3 == 0 { -1.0 } else { 0.0 }));
    bars_from_closes("2025-06-01", &closes)
}

/// Frames with every indicator defined and the entry rule satisfied.
pub fn bullish_frames(bars: &[PriceBar], atr: f64) -> Vec<IndicatorFrame> {
    bars.iter()
        .map(|b| IndicatorFrame {
            date: b.date,
            rsi: Some(60.0),
            ema_short: Some(105.0),
            ema_long: Some(100.0),
            macd_histogram: Some(0.5),
            atr: Some(atr),
        })
        .collect()
}

pub fn scan_config(parallel: bool) -> ScanConfig {
    ScanConfig {
        start_date: date(2025, 1, 1),
        end_date: date(2025, 12, 31),
        parallel,
        fail_fast: false,
    }
}
