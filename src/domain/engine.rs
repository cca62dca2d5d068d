//! Signal engine: the per-instrument position state machine.
//!
//! Each date is one call to [`step`], which takes the previous
//! [`PositionState`] and returns the next one plus at most one signal.
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. Flat: BUY when every indicator is defined, EMA short > EMA long,
//!    RSI is inside the buy band and the MACD histogram is positive.
//! 2. Long: time stop once the position is `max_holding_days` old.
//! 3. Long: ATR stop when close < the stop loss fixed at entry.
//! 4. Long: ratchet the trailing stop (no signal).
//! 5. Long: trailing stop when close < the ratcheted level.
//!
//! A position still open at the end of history stays open.

use std::iter::Zip;
use std::slice::Iter;

use crate::domain::error::{MalformedInput, SignalError};
use crate::domain::frame::{EntryInputs, IndicatorFrame};
use crate::domain::ohlcv::PriceBar;
use crate::domain::params::SignalParams;
use crate::domain::position::{OpenPosition, PositionState};
use crate::domain::signal::{SignalEvent, SignalKind};

/// Advance one date.
pub fn step(
    state: PositionState,
    bar: &PriceBar,
    frame: &IndicatorFrame,
    params: &SignalParams,
) -> (PositionState, Option<SignalKind>) {
    match state {
        PositionState::Flat => match frame.entry_inputs() {
            Some(inputs) if entry_confirmed(&inputs, params) => {
                let pos = OpenPosition::open(bar.date, bar.close, inputs.atr, params);
                (PositionState::Long(pos), Some(SignalKind::Buy))
            }
            _ => (PositionState::Flat, None),
        },
        PositionState::Long(mut pos) => {
            if pos.holding_days(bar.date) >= params.max_holding_days {
                return (PositionState::Flat, Some(SignalKind::SellTimeStop));
            }
            if bar.close < pos.stop_loss_price {
                return (PositionState::Flat, Some(SignalKind::SellAtrStop));
            }
            // ATR is defined on every date after a valid entry.
            if let Some(atr) = frame.atr {
                pos.ratchet(bar.close, atr, params.trailing_atr_multiplier);
            }
            if bar.close < pos.trailing_stop_price {
                return (PositionState::Flat, Some(SignalKind::SellTrailingStop));
            }
            (PositionState::Long(pos), None)
        }
    }
}

fn entry_confirmed(inputs: &EntryInputs, params: &SignalParams) -> bool {
    inputs.ema_short > inputs.ema_long
        && params.rsi_in_band(inputs.rsi)
        && inputs.macd_histogram > 0.0
}

/// Reject series the engine cannot fold over: misaligned frames, dates that
/// do not strictly increase, or bars with missing/non-positive prices.
pub fn validate_series(
    code: &str,
    bars: &[PriceBar],
    frames: &[IndicatorFrame],
) -> Result<(), SignalError> {
    let malformed = |source| SignalError::malformed(code, source);

    if bars.len() != frames.len() {
        return Err(malformed(MalformedInput::LengthMismatch {
            bars: bars.len(),
            frames: frames.len(),
        }));
    }

    for (bar, frame) in bars.iter().zip(frames) {
        if !bar.is_well_formed() {
            return Err(malformed(MalformedInput::BadPrice { date: bar.date }));
        }
        if frame.date != bar.date {
            return Err(malformed(MalformedInput::DateMismatch {
                bar: bar.date,
                frame: frame.date,
            }));
        }
    }

    if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(malformed(MalformedInput::NonIncreasingDate {
            previous: w[0].date,
            date: w[1].date,
        }));
    }

    Ok(())
}

/// Lazily folds one instrument's history, yielding signals as they fire.
pub struct Signals<'a> {
    code: &'a str,
    params: &'a SignalParams,
    steps: Zip<Iter<'a, PriceBar>, Iter<'a, IndicatorFrame>>,
    state: PositionState,
}

impl Signals<'_> {
    /// Position state after the dates consumed so far.
    pub fn state(&self) -> &PositionState {
        &self.state
    }
}

impl Iterator for Signals<'_> {
    type Item = SignalEvent;

    fn next(&mut self) -> Option<SignalEvent> {
        for (bar, frame) in self.steps.by_ref() {
            let (next, kind) = step(std::mem::take(&mut self.state), bar, frame, self.params);
            self.state = next;
            if let Some(kind) = kind {
                return Some(SignalEvent {
                    date: bar.date,
                    code: self.code.to_string(),
                    kind,
                    price: bar.close,
                });
            }
        }
        None
    }
}

/// Validate the inputs and return a signal iterator. Histories shorter than
/// [`SignalParams::min_history`] produce no signals.
pub fn signals<'a>(
    code: &'a str,
    bars: &'a [PriceBar],
    frames: &'a [IndicatorFrame],
    params: &'a SignalParams,
) -> Result<Signals<'a>, SignalError> {
    validate_series(code, bars, frames)?;
    let len = if bars.len() < params.min_history() {
        0
    } else {
        bars.len()
    };
    Ok(Signals {
        code,
        params,
        steps: bars[..len].iter().zip(frames[..len].iter()),
        state: PositionState::Flat,
    })
}

pub fn run_signals(
    code: &str,
    bars: &[PriceBar],
    frames: &[IndicatorFrame],
    params: &SignalParams,
) -> Result<Vec<SignalEvent>, SignalError> {
    Ok(signals(code, bars, frames, params)?.collect())
}

/// State at the end of history, after every signal has fired.
pub fn final_state(
    code: &str,
    bars: &[PriceBar],
    frames: &[IndicatorFrame],
    params: &SignalParams,
) -> Result<PositionState, SignalError> {
    let mut iter = signals(code, bars, frames, params)?;
    iter.by_ref().for_each(drop);
    Ok(iter.state)
}
