//! Integration tests over the public API.
//!
//! Tests cover:
//! - Engine scenarios with hand-built indicator frames
//! - Full scan pipeline with a mock data port
//! - Partial universes (skipped and failed instruments alongside scanned ones)
//! - Reports rendered from a scan result

mod common;

use common::*;
use signalscan::adapters::csv_report::CsvReportAdapter;
use signalscan::adapters::text_report::TextReportAdapter;
use signalscan::domain::engine::{final_state, run_signals, signals, step};
use signalscan::domain::error::{MalformedInput, SignalError};
use signalscan::domain::frame::compute_frames;
use signalscan::domain::params::SignalParams;
use signalscan::domain::position::PositionState;
use signalscan::domain::scan::{scan_universe, SkipReason};
use signalscan::domain::signal::SignalKind;
use signalscan::domain::universe::Universe;

fn short_window_params() -> SignalParams {
    SignalParams {
        ema_short_period: 1,
        ema_long_period: 2,
        rsi_window: 2,
        atr_window: 2,
        macd_fast: 1,
        macd_slow: 2,
        macd_signal: 1,
        ..SignalParams::default()
    }
}

fn kinds(bars: &[PriceBar], frames: &[IndicatorFrame], params: &SignalParams) -> Vec<SignalKind> {
    run_signals("TEST", bars, frames, params)
        .unwrap()
        .into_iter()
        .map(|e| e.kind)
        .collect()
}

mod engine_scenarios {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn close_equal_to_stop_loss_holds() {
        // stop loss is 98 and the trail is 98.5; only the trail fires
        let bars = bars_from_closes("2025-07-01", &[100.0, 98.0]);
        let frames = bullish_frames(&bars, 1.0);
        assert_eq!(
            kinds(&bars, &frames, &short_window_params()),
            vec![SignalKind::Buy, SignalKind::SellTrailingStop]
        );
    }

    #[test]
    fn time_stop_then_reentry_next_date() {
        let params = SignalParams {
            max_holding_days: 3,
            ..short_window_params()
        };
        let bars = bars_from_closes("2025-07-01", &[100.0, 101.0, 102.0, 103.0, 104.0]);
        let frames = bullish_frames(&bars, 1.0);
        let events = run_signals("XOM", &bars, &frames, &params).unwrap();

        let summary: Vec<_> = events.iter().map(|e| (e.date, e.kind)).collect();
        assert_eq!(
            summary,
            vec![
                (date(2025, 7, 1), SignalKind::Buy),
                (date(2025, 7, 4), SignalKind::SellTimeStop),
                (date(2025, 7, 5), SignalKind::Buy),
            ]
        );
    }

    #[test]
    fn holding_period_counts_calendar_days() {
        let bars = vec![
            make_bar("2025-07-01", 100.0),
            make_bar("2025-07-02", 101.0),
            make_bar("2025-07-14", 102.0),
        ];
        let frames = bullish_frames(&bars, 1.0);
        assert_eq!(
            kinds(&bars, &frames, &short_window_params()),
            vec![SignalKind::Buy, SignalKind::SellTimeStop]
        );
    }

    #[test]
    fn open_position_is_not_force_closed() {
        let bars = bars_from_closes("2025-07-01", &[100.0, 101.0, 102.0]);
        let frames = bullish_frames(&bars, 1.0);
        let params = short_window_params();

        assert_eq!(kinds(&bars, &frames, &params), vec![SignalKind::Buy]);
        let state = final_state("AAPL", &bars, &frames, &params).unwrap();
        let pos = state.position().unwrap();
        assert_eq!(pos.entry_date, date(2025, 7, 1));
        assert_relative_eq!(pos.stop_loss_price, 98.0);
        // ratcheted to 102 - 1.5
        assert_relative_eq!(pos.trailing_stop_price, 100.5);
    }

    #[test]
    fn undefined_indicator_blocks_entry() {
        let bars = bars_from_closes("2025-07-01", &[100.0, 101.0]);
        let mut frames = bullish_frames(&bars, 1.0);
        frames[0].macd_histogram = None;
        let events = run_signals("AAPL", &bars, &frames, &short_window_params()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, date(2025, 7, 2));
    }

    #[test]
    fn step_is_a_pure_fold() {
        let bars = bars_from_closes("2025-07-01", &[100.0, 102.0]);
        let frames = bullish_frames(&bars, 1.0);
        let params = short_window_params();

        let (state, kind) = step(PositionState::Flat, &bars[0], &frames[0], &params);
        assert_eq!(kind, Some(SignalKind::Buy));
        let again = step(PositionState::Flat, &bars[0], &frames[0], &params);
        assert_eq!(again, (state.clone(), kind));

        let (next, kind) = step(state, &bars[1], &frames[1], &params);
        assert_eq!(kind, None);
        assert!(next.is_long());
    }

    #[test]
    fn ten_bars_with_default_params_emit_nothing() {
        let bars = generate_bars("2025-07-01", 10, 100.0, 2.0);
        let frames = compute_frames(&bars, &SignalParams::default());
        let events = run_signals("NEW", &bars, &frames, &SignalParams::default()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn signals_iterator_exposes_state() {
        let bars = bars_from_closes("2025-07-01", &[100.0, 101.0]);
        let frames = bullish_frames(&bars, 1.0);
        let params = short_window_params();
        let mut iter = signals("ETH-USD", &bars, &frames, &params).unwrap();

        assert_eq!(iter.next().map(|e| e.kind), Some(SignalKind::Buy));
        assert!(iter.state().is_long());
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn unordered_dates_are_malformed() {
        let bars = vec![make_bar("2025-07-02", 100.0), make_bar("2025-07-01", 101.0)];
        let frames = bullish_frames(&bars, 1.0);
        let err = run_signals("SOL-USD", &bars, &frames, &short_window_params()).unwrap_err();
        match err {
            SignalError::Malformed { code, source } => {
                assert_eq!(code, "SOL-USD");
                assert_eq!(
                    source,
                    MalformedInput::NonIncreasingDate {
                        previous: date(2025, 7, 2),
                        date: date(2025, 7, 1),
                    }
                );
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn misaligned_frames_are_malformed() {
        let bars = bars_from_closes("2025-07-01", &[100.0, 101.0, 102.0]);
        let frames = bullish_frames(&bars[..2], 1.0);
        let err = run_signals("X", &bars, &frames, &short_window_params()).unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }
}

mod scan_pipeline {
    use super::*;

    #[test]
    fn rally_produces_buy_then_time_stop() {
        let port = MockDataPort::new().with_bars("BTC-USD", dip_then_rally());
        let universe = Universe::single("BTC-USD");
        let result = scan_universe(
            &port,
            &universe,
            &scan_config(false),
            &SignalParams::default(),
        );

        assert!(result.failed.is_empty());
        assert_eq!(result.outcomes.len(), 1);
        let events = &result.events;
        assert!(events.len() >= 2, "expected a round trip, got {events:?}");
        assert_eq!(events[0].kind, SignalKind::Buy);
        assert_eq!(events[1].kind, SignalKind::SellTimeStop);
        assert_eq!((events[1].date - events[0].date).num_days(), 10);
    }

    #[test]
    fn scan_matches_direct_engine_run() {
        let bars = dip_then_rally();
        let params = SignalParams::default();
        let frames = compute_frames(&bars, &params);
        let direct = run_signals("BTC-USD", &bars, &frames, &params).unwrap();

        let port = MockDataPort::new().with_bars("BTC-USD", bars);
        let result = scan_universe(
            &port,
            &Universe::single("BTC-USD"),
            &scan_config(true),
            &params,
        );
        assert_eq!(result.events, direct);
        assert_eq!(result.outcomes[0].signals, direct.len());
    }

    #[test]
    fn events_grouped_in_universe_order() {
        let port = MockDataPort::new()
            .with_bars("ETH-USD", dip_then_rally())
            .with_bars("BTC-USD", dip_then_rally());
        let universe = Universe::from_lists([("crypto", "ETH-USD,BTC-USD")]).unwrap();
        let result = scan_universe(
            &port,
            &universe,
            &scan_config(true),
            &SignalParams::default(),
        );

        let codes: Vec<&str> = result.events.iter().map(|e| e.code.as_str()).collect();
        let split = codes.iter().position(|c| *c == "BTC-USD").unwrap();
        assert!(codes[..split].iter().all(|c| *c == "ETH-USD"));
        assert!(codes[split..].iter().all(|c| *c == "BTC-USD"));
    }

    #[test]
    fn partial_universe_some_skipped_others_proceed() {
        let port = MockDataPort::new()
            .with_bars("AAPL", dip_then_rally())
            .with_bars("NEW", generate_bars("2025-07-01", 10, 50.0, 1.0))
            .with_error("GONE", "file unreadable");
        let universe = Universe::from_lists([("tech", "AAPL,NEW,EMPTY"), ("other", "GONE")]).unwrap();
        let result = scan_universe(
            &port,
            &universe,
            &scan_config(false),
            &SignalParams::default(),
        );

        assert_eq!(result.attempted(), 4);
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.skipped.len(), 2);
        assert_eq!(
            result.skipped[0].reason,
            SkipReason::InsufficientHistory {
                bars: 10,
                minimum: 26
            }
        );
        assert_eq!(result.skipped[1].code, "EMPTY");
        assert_eq!(result.skipped[1].reason, SkipReason::NoData);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].group, "other");
        assert!(matches!(result.failed[0].error, SignalError::Data { .. }));
    }

    #[test]
    fn exact_min_history_is_scanned() {
        let port =
            MockDataPort::new().with_bars("EDGE", generate_bars("2025-07-01", 26, 100.0, 0.5));
        let result = scan_universe(
            &port,
            &Universe::single("EDGE"),
            &scan_config(false),
            &SignalParams::default(),
        );
        assert_eq!(result.outcomes.len(), 1);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn malformed_instrument_is_isolated() {
        let mut bad = dip_then_rally();
        bad.swap(30, 31);
        let port = MockDataPort::new()
            .with_bars("BAD", bad)
            .with_bars("GOOD", dip_then_rally());
        let universe = Universe::from_lists([("g", "BAD,GOOD")]).unwrap();
        let result = scan_universe(
            &port,
            &universe,
            &scan_config(true),
            &SignalParams::default(),
        );

        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].code, "BAD");
        assert_eq!(result.failed[0].error.exit_code(), 6);
        assert_eq!(result.outcomes[0].code, "GOOD");
        assert!(!result.events.is_empty());
    }

    #[test]
    fn malformed_short_series_is_a_failure_not_a_skip() {
        let mut bars = generate_bars("2025-07-01", 10, 100.0, 1.0);
        bars[5].close = f64::NAN;
        bars.swap(2, 3);
        let port = MockDataPort::new().with_bars("X", bars);
        let result = scan_universe(
            &port,
            &Universe::single("X"),
            &scan_config(false),
            &SignalParams::default(),
        );

        assert!(result.skipped.is_empty());
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].code, "X");
        assert_eq!(result.failed[0].error.exit_code(), 6);
    }

    #[test]
    fn date_window_is_applied_before_history_check() {
        let port = MockDataPort::new().with_bars("AAPL", dip_then_rally());
        let mut config = scan_config(false);
        config.start_date = date(2025, 7, 25);
        let result = scan_universe(
            &port,
            &Universe::single("AAPL"),
            &config,
            &SignalParams::default(),
        );
        assert!(matches!(
            result.skipped[0].reason,
            SkipReason::InsufficientHistory { .. }
        ));
    }
}

mod reports {
    use super::*;

    #[test]
    fn text_and_csv_reports_agree_on_rows() {
        let port = MockDataPort::new().with_bars("BTC-USD", dip_then_rally());
        let result = scan_universe(
            &port,
            &Universe::single("BTC-USD"),
            &scan_config(false),
            &SignalParams::default(),
        );

        let mut text = Vec::new();
        TextReportAdapter.render(&result.events, &mut text).unwrap();
        let text = String::from_utf8(text).unwrap();

        let mut csv = Vec::new();
        CsvReportAdapter.render(&result.events, &mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();

        assert_eq!(text.lines().count(), result.events.len());
        assert_eq!(csv.lines().count(), result.events.len() + 1);
        assert!(text.lines().next().unwrap().contains("| BUY "));
        assert!(csv.lines().nth(1).unwrap().contains(",BUY,"));
    }
}
