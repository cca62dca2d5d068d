//! Relative Strength Index with Wilder smoothing.
//!
//! The first average gain/loss is the simple mean of the first n price
//! changes; afterwards avg = (prev_avg * (n-1) + current) / n.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), or 100 when avg_loss is 0.
//! The first n points are undefined (n changes need n+1 closes).

use crate::domain::indicator::{simple_series, IndicatorSeries};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut raw = vec![None; bars.len()];
    if period == 0 || bars.len() <= period {
        return simple_series(bars, raw);
    }

    let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();
    let n = period as f64;

    let (mut avg_gain, mut avg_loss) = changes[..period]
        .iter()
        .fold((0.0, 0.0), |(g, l), &c| (g + c.max(0.0), l + (-c).max(0.0)));
    avg_gain /= n;
    avg_loss /= n;
    raw[period] = Some(rsi_from(avg_gain, avg_loss));

    for (i, &change) in changes.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (n - 1.0) + change.max(0.0)) / n;
        avg_loss = (avg_loss * (n - 1.0) + (-change).max(0.0)) / n;
        raw[i + 1] = Some(rsi_from(avg_gain, avg_loss));
    }

    simple_series(bars, raw)
}

fn rsi_from(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
