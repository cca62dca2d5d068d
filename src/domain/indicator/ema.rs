//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the SMA of the first n values, then
//! EMA[i] = x[i]*k + EMA[i-1]*(1-k). The first n-1 points are undefined.

use crate::domain::indicator::{simple_series, IndicatorSeries};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    simple_series(bars, ema_of(&closes, period))
}

/// EMA over raw values, aligned with the input. Period 0 or a series shorter
/// than the period yields all `None`.
pub(crate) fn ema_of(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);

    for (slot, &x) in out.iter_mut().zip(values).skip(period) {
        ema = x * k + ema * (1.0 - k);
        *slot = Some(ema);
    }
    out
}
