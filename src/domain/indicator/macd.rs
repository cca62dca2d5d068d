//! Moving Average Convergence Divergence.
//!
//! line = EMA(fast) - EMA(slow), signal = EMA(signal) of the line,
//! histogram = line - signal. The line exists once both EMAs do; the
//! histogram is undefined for the first max(fast, slow) - 1 + signal - 1 points.

use crate::domain::indicator::ema::ema_of;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_of(&closes, fast);
    let ema_slow = ema_of(&closes, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    // The signal EMA runs over the defined tail of the line only.
    let line_start = line.iter().position(Option::is_some).unwrap_or(line.len());
    let tail: Vec<f64> = line[line_start..].iter().flatten().copied().collect();
    let mut signal = vec![None; line_start];
    signal.extend(ema_of(&tail, signal_period));

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (l, s) = (line[i], signal.get(i).copied().flatten());
            IndicatorPoint {
                date: bar.date,
                valid: l.is_some() && s.is_some(),
                value: IndicatorValue::Macd {
                    histogram: l.zip(s).map(|(l, s)| l - s).unwrap_or(0.0),
                },
            }
        })
        .collect();

    IndicatorSeries { values }
}
