//! Average True Range with Wilder smoothing.
//!
//! TR[0] = high - low (no previous close). The seed at index n-1 is the mean
//! of the first n true ranges; afterwards ATR = (prev * (n-1) + TR) / n.

use crate::domain::indicator::{simple_series, IndicatorSeries};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_atr(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut raw = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return simple_series(bars, raw);
    }

    let true_ranges: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match i {
            0 => bar.high - bar.low,
            _ => bar.true_range(bars[i - 1].close),
        })
        .collect();

    let n = period as f64;
    let mut atr = true_ranges[..period].iter().sum::<f64>() / n;
    raw[period - 1] = Some(atr);
    for (i, &tr) in true_ranges.iter().enumerate().skip(period) {
        atr = (atr * (n - 1.0) + tr) / n;
        raw[i] = Some(atr);
    }

    simple_series(bars, raw)
}
