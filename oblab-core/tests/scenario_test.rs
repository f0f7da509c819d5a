//! End-to-end scenarios over hand-built series with known outcomes.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use oblab_core::scan::detect_pivots;
use oblab_core::*;

fn day(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(i as i64)
}

fn raw(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    data.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Bar::new(day(i), o, h, l, c))
        .collect()
}

/// Series with fixed indicator readings so filters are fully controlled.
fn prepared(data: &[(f64, f64, f64, f64)], ema: f64, atr: f64) -> Vec<PriceBar> {
    raw(data)
        .iter()
        .map(|bar| PriceBar::from_bar(bar, ema, atr))
        .collect()
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// High pivot at 1 (12.0) broken by the close at 3; bearish candle 2 is the
// block (mid 11.0, stop 10.2). Bar 4 re-tests and fills; bar 5 reaches 1R,
// bar 6 reaches 2R. High pivot at 3 (12.6) is broken again by bar 6.
const WINNER: [(f64, f64, f64, f64); 7] = [
    (10.0, 11.0, 9.0, 10.5),
    (10.5, 12.0, 10.0, 11.5),
    (11.5, 11.8, 10.2, 10.5),
    (10.5, 12.6, 10.4, 12.5),
    (11.2, 11.6, 10.9, 11.5),
    (11.5, 11.9, 11.3, 11.7),
    (11.7, 12.7, 11.6, 12.65),
];

fn mirrored(data: &[(f64, f64, f64, f64)]) -> Vec<(f64, f64, f64, f64)> {
    data.iter()
        .map(|&(o, h, l, c)| (30.0 - o, 30.0 - l, 30.0 - h, 30.0 - c))
        .collect()
}

// Bar 1 closes at 9 below its own low of 10, so validation rejects it.
const REFERENCE: [(f64, f64, f64, f64); 4] = [
    (10.0, 12.0, 9.0, 11.0),
    (11.0, 13.0, 10.0, 9.0),
    (9.0, 10.0, 8.0, 9.5),
    (9.5, 14.0, 9.0, 13.8),
];

fn reference_config() -> EngineConfig {
    EngineConfig {
        ob_lookback: 3,
        entry_wait_bars: 3,
        ..EngineConfig::default()
    }
}

#[test]
fn reference_fixture_fails_validation() {
    let err = run_backtest(&raw(&REFERENCE), &reference_config()).unwrap_err();
    assert!(
        matches!(err, EngineError::MalformedBar { index: 1, .. }),
        "unexpected error {err:?}"
    );
}

#[test]
fn reference_fixture_finds_zero_risk_block() {
    let bars = prepared(&REFERENCE, 0.0, 1.0);

    assert_eq!(
        detect_pivots(&bars),
        vec![
            Pivot {
                index: 1,
                kind: PivotKind::High,
                value: 13.0
            },
            Pivot {
                index: 2,
                kind: PivotKind::Low,
                value: 8.0
            },
        ]
    );

    let report = run_prepared(&bars, &reference_config());
    assert_eq!(report.diagnostics.structure_breaks, 1);
    assert_eq!(
        report.order_blocks,
        vec![OrderBlock {
            direction: Direction::Bullish,
            ob_index: 1,
            bos_index: 3,
            ob_open: 11.0,
            ob_close: 9.0,
            ob_high: 13.0,
            ob_low: 10.0,
            mid_body: 10.0,
            stop_level: 10.0,
        }]
    );
    assert_eq!(report.diagnostics.zero_risk_rejections, 1);
    assert_eq!(report.diagnostics.entries, 0);
    assert!(report.trades.is_empty());
    assert!(report.open_trades.is_empty());
    assert_eq!(report.stats.trade_count, 0);
    assert_eq!(report.stats.win_rate, 0.0);
    assert_eq!(QualityVerdict::grade(&report.stats), QualityVerdict::NoTrades);
}

#[test]
fn full_winner_takes_partial_then_second_target() {
    let bars = prepared(&WINNER, 0.0, 1.0);
    let report = run_prepared(&bars, &EngineConfig::default());

    let d = &report.diagnostics;
    assert_eq!(d.pivots, 2);
    assert_eq!(d.structure_breaks, 2);
    assert_eq!(d.order_blocks, 2);
    assert_eq!(d.entries, 1);
    // The block behind the second break has no bars left to fill on.
    assert_eq!(d.entry_timeouts, 1);

    let first = &report.order_blocks[0];
    assert_eq!((first.ob_index, first.bos_index), (2, 3));
    approx(first.mid_body, 11.0);
    approx(first.stop_level, 10.2);
    let second = &report.order_blocks[1];
    assert_eq!((second.ob_index, second.bos_index), (2, 6));

    assert_eq!(report.trades.len(), 1);
    let t = &report.trades[0];
    assert_eq!(t.direction, Direction::Bullish);
    assert_eq!(t.entry_index, 4);
    assert_eq!(t.entry_timestamp, day(4));
    approx(t.entry_price, 11.0);
    approx(t.stop_price, 10.2);
    approx(t.risk, 0.8);
    approx(t.target1, 11.8);
    approx(t.target2, 12.6);
    assert_eq!(t.partial_index, Some(5));
    assert_eq!(t.exit_index, Some(6));
    assert_eq!(t.exit_timestamp, Some(day(6)));
    assert_eq!(t.exit_reason, Some(ExitReason::Target2));
    assert_eq!(t.stage, TradeStage::Closed);
    approx(t.active_stop, 11.0);
    approx(t.realized_r, 1.5);

    assert_eq!(report.stats.trade_count, 1);
    assert_eq!(report.stats.win_count, 1);
    approx(report.stats.total_r, 1.5);
    approx(report.stats.win_rate, 1.0);
}

#[test]
fn bar_touching_stop_and_target_counts_as_stop() {
    let mut data = WINNER;
    data[5] = (11.5, 11.9, 10.1, 11.7);
    let report = run_prepared(&prepared(&data, 0.0, 1.0), &EngineConfig::default());

    assert_eq!(report.trades.len(), 1);
    let t = &report.trades[0];
    assert_eq!(t.exit_reason, Some(ExitReason::StopLoss));
    assert_eq!(t.exit_index, Some(5));
    assert_eq!(t.partial_index, None);
    approx(t.realized_r, -1.0);
    assert_eq!(report.stats.loss_count, 1);
}

#[test]
fn entry_bar_policy_checks_the_fill_bar() {
    // The fill bar dips through the stop after filling.
    let mut data = WINNER;
    data[4] = (11.2, 11.6, 10.1, 11.5);
    let bars = prepared(&data, 0.0, 1.0);

    let next_bar = run_prepared(&bars, &EngineConfig::default());
    assert_eq!(next_bar.trades[0].exit_reason, Some(ExitReason::Target2));
    approx(next_bar.trades[0].realized_r, 1.5);

    let entry_bar = run_prepared(
        &bars,
        &EngineConfig {
            exit_scan_start: ExitScanStart::EntryBar,
            ..EngineConfig::default()
        },
    );
    let t = &entry_bar.trades[0];
    assert_eq!(t.exit_reason, Some(ExitReason::StopLoss));
    assert_eq!(t.exit_index, Some(4));
    approx(t.realized_r, -1.0);
}

#[test]
fn trade_open_at_series_end_is_excluded_from_stats() {
    let bars = prepared(&WINNER[..6], 0.0, 1.0);
    let report = run_prepared(&bars, &EngineConfig::default());

    assert!(report.trades.is_empty());
    assert_eq!(report.open_trades.len(), 1);
    let t = &report.open_trades[0];
    assert_eq!(t.stage, TradeStage::PartialClosed);
    assert_eq!(t.partial_index, Some(5));
    assert_eq!(t.exit_index, None);
    approx(t.realized_r, 0.5);

    assert_eq!(report.stats.trade_count, 0);
    assert_eq!(report.stats.total_r, 0.0);
    assert_eq!(report.stats.open_at_end, 1);
}

#[test]
fn filters_turn_entries_into_timeouts() {
    let bars = prepared(&WINNER, 0.0, 1.0);

    let high_threshold = EngineConfig {
        atr_threshold: 2.0,
        ..EngineConfig::default()
    };
    let report = run_prepared(&bars, &high_threshold);
    assert!(report.trades.is_empty());
    assert_eq!(report.diagnostics.entry_timeouts, 2);

    // EMA above every close blocks bullish entries.
    let report = run_prepared(&prepared(&WINNER, 50.0, 1.0), &EngineConfig::default());
    assert!(report.trades.is_empty());
    assert_eq!(report.diagnostics.entry_timeouts, 2);
}

#[test]
fn entry_window_is_counted_from_the_break() {
    let bars = prepared(&WINNER, 0.0, 1.0);
    // Bar 4 is exactly one bar after the break at 3.
    let one_bar = EngineConfig {
        entry_wait_bars: 1,
        ..EngineConfig::default()
    };
    let report = run_prepared(&bars, &one_bar);
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].entry_index, 4);

    let mut late = WINNER.to_vec();
    // Bar 4 no longer qualifies (bearish), so the first fill moves past the window.
    late[4] = (11.5, 11.6, 10.9, 11.2);
    late.insert(5, (11.2, 11.6, 10.9, 11.5));
    let report = run_prepared(&prepared(&late, 0.0, 1.0), &one_bar);
    assert!(report.trades.iter().all(|t| t.bos_index != 3));
}

#[test]
fn lookback_bounds_the_block_search() {
    let bars = prepared(&WINNER, 0.0, 1.0);
    let config = EngineConfig {
        ob_lookback: 1,
        ..EngineConfig::default()
    };
    let report = run_prepared(&bars, &config);
    // Break at 3 reaches candle 2; break at 6 only sees bullish candle 5.
    assert_eq!(report.diagnostics.order_blocks, 1);
    assert_eq!(report.diagnostics.breaks_without_block, 1);
    assert_eq!(report.trades.len(), 1);
}

#[test]
fn trading_mode_filters_block_direction() {
    let bars = prepared(&WINNER, 0.0, 1.0);
    let short_only = EngineConfig {
        trading_mode: TradingMode::ShortOnly,
        ..EngineConfig::default()
    };
    let report = run_prepared(&bars, &short_only);
    assert!(report.trades.is_empty());
    assert_eq!(report.diagnostics.skipped_by_mode, 2);
    assert_eq!(report.order_blocks.len(), 2);
}

#[test]
fn bearish_mirror_produces_mirrored_trade() {
    let bars = prepared(&mirrored(&WINNER), 100.0, 1.0);
    let report = run_prepared(&bars, &EngineConfig::default());

    assert_eq!(report.trades.len(), 1);
    let t = &report.trades[0];
    assert_eq!(t.direction, Direction::Bearish);
    assert_eq!(t.entry_index, 4);
    approx(t.entry_price, 19.0);
    approx(t.stop_price, 19.8);
    approx(t.target1, 18.2);
    approx(t.target2, 17.4);
    assert_eq!(t.partial_index, Some(5));
    assert_eq!(t.exit_reason, Some(ExitReason::Target2));
    approx(t.realized_r, 1.5);
}

#[test]
fn runs_are_deterministic() {
    let bars = raw(&WINNER);
    let config = EngineConfig {
        ema_span: 3,
        atr_span: 3,
        ..EngineConfig::default()
    };
    let a = run_backtest(&bars, &config).unwrap();
    let b = run_backtest(&bars, &config).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(
        RunFingerprint::compute(&config, &bars),
        RunFingerprint::compute(&config, &bars)
    );
}

#[test]
fn malformed_bar_is_reported_with_its_index() {
    let mut bars = raw(&WINNER);
    bars[3].low = 13.0;
    let err = run_backtest(&bars, &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, EngineError::MalformedBar { index: 3, .. }));

    let mut bars = raw(&WINNER);
    bars[5].timestamp = bars[4].timestamp;
    let err = run_backtest(&bars, &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, EngineError::MalformedBar { index: 5, .. }));
}
