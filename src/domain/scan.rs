//! Universe driver: fetch, compute indicators and run the engine for every
//! instrument in a universe.
//!
//! Instruments never share state, so they can run on rayon's pool. Results
//! are gathered back in universe order either way.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::domain::engine;
use crate::domain::error::SignalError;
use crate::domain::frame::compute_frames;
use crate::domain::params::SignalParams;
use crate::domain::signal::SignalEvent;
use crate::domain::universe::Universe;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub parallel: bool,
    pub fail_fast: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoData,
    InsufficientHistory { bars: usize, minimum: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCode {
    pub group: String,
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct FailedCode {
    pub group: String,
    pub code: String,
    pub error: SignalError,
}

/// Summary of one instrument that made it through the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentOutcome {
    pub group: String,
    pub code: String,
    pub bars: usize,
    pub signals: usize,
    pub open_at_end: bool,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    /// Every instrument's events, instrument by instrument in universe order.
    pub events: Vec<SignalEvent>,
    pub outcomes: Vec<InstrumentOutcome>,
    pub skipped: Vec<SkippedCode>,
    pub failed: Vec<FailedCode>,
}

impl ScanResult {
    pub fn attempted(&self) -> usize {
        self.outcomes.len() + self.skipped.len() + self.failed.len()
    }
}

enum Outcome {
    Scanned(InstrumentOutcome, Vec<SignalEvent>),
    Skipped(SkippedCode),
    Failed(FailedCode),
}

pub fn scan_universe(
    data_port: &(dyn DataPort + Sync),
    universe: &Universe,
    config: &ScanConfig,
    params: &SignalParams,
) -> ScanResult {
    let instruments: Vec<(&str, &str)> = universe.instruments().collect();
    tracing::info!(
        instruments = instruments.len(),
        start = %config.start_date,
        end = %config.end_date,
        parallel = config.parallel,
        "scanning universe"
    );

    let run = |&(group, code): &(&str, &str)| {
        scan_instrument(data_port, group, code, config, params)
    };
    let outcomes: Vec<Outcome> = if config.parallel {
        instruments.par_iter().map(run).collect()
    } else {
        instruments.iter().map(run).collect()
    };

    let mut result = ScanResult::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Scanned(summary, events) => {
                result.events.extend(events);
                result.outcomes.push(summary);
            }
            Outcome::Skipped(skip) => result.skipped.push(skip),
            Outcome::Failed(fail) => result.failed.push(fail),
        }
    }

    tracing::info!(
        scanned = result.outcomes.len(),
        skipped = result.skipped.len(),
        failed = result.failed.len(),
        signals = result.events.len(),
        "scan complete"
    );
    result
}

fn scan_instrument(
    data_port: &(dyn DataPort + Sync),
    group: &str,
    code: &str,
    config: &ScanConfig,
    params: &SignalParams,
) -> Outcome {
    let skipped = |reason| {
        Outcome::Skipped(SkippedCode {
            group: group.to_string(),
            code: code.to_string(),
            reason,
        })
    };
    let failed = |error: SignalError| {
        tracing::error!(code, %error, "instrument failed");
        Outcome::Failed(FailedCode {
            group: group.to_string(),
            code: code.to_string(),
            error,
        })
    };

    let bars = match data_port.fetch_ohlcv(code, config.start_date, config.end_date) {
        Ok(bars) => bars,
        Err(e) => return failed(e),
    };

    if bars.is_empty() {
        tracing::warn!(code, "skipping: no data found");
        return skipped(SkipReason::NoData);
    }

    // Malformed input is an error even when the history is too short to scan.
    let frames = compute_frames(&bars, params);
    if let Err(e) = engine::validate_series(code, &bars, &frames) {
        return failed(e);
    }

    let minimum = params.min_history();
    if bars.len() < minimum {
        tracing::warn!(code, bars = bars.len(), minimum, "skipping: insufficient history");
        return skipped(SkipReason::InsufficientHistory {
            bars: bars.len(),
            minimum,
        });
    }

    let mut signals = match engine::signals(code, &bars, &frames, params) {
        Ok(iter) => iter,
        Err(e) => return failed(e),
    };
    let events: Vec<SignalEvent> = signals.by_ref().collect();
    let open_at_end = signals.state().is_long();

    tracing::debug!(code, bars = bars.len(), signals = events.len(), open_at_end, "scanned");

    Outcome::Scanned(
        InstrumentOutcome {
            group: group.to_string(),
            code: code.to_string(),
            bars: bars.len(),
            signals: events.len(),
            open_at_end,
        },
        events,
    )
}
