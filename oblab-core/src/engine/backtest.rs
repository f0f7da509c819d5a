//! Backtest orchestration for a single price series.

use crate::config::EngineConfig;
use crate::domain::{Bar, OrderBlock, PriceBar, Trade};
use crate::engine::simulator::PositionSimulator;
use crate::error::EngineError;
use crate::preprocess::preprocess;
use crate::scan::{scan_entry, structure_breaks, EntryScan, OrderBlockResolver, PivotDetector, Resolution};
use crate::stats::BacktestStats;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A pivot needs one bar on each side, so shorter series cannot be scanned.
pub const MIN_BARS: usize = 3;

/// Per-stage counters explaining where candidate setups dropped out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDiagnostics {
    pub bar_count: usize,
    pub pivots: usize,
    pub structure_breaks: usize,
    pub order_blocks: usize,
    pub duplicate_blocks: usize,
    pub breaks_without_block: usize,
    pub skipped_by_mode: usize,
    pub entries: usize,
    pub entry_timeouts: usize,
    pub zero_risk_rejections: usize,
    pub open_at_end: usize,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Closed trades ordered by entry bar.
    pub trades: Vec<Trade>,
    /// Trades still open when the series ended; excluded from `stats`.
    pub open_trades: Vec<Trade>,
    pub order_blocks: Vec<OrderBlock>,
    pub stats: BacktestStats,
    pub diagnostics: ScanDiagnostics,
}

/// Validate, preprocess, and run the full pipeline over `bars`.
pub fn run_backtest(bars: &[Bar], config: &EngineConfig) -> Result<BacktestReport, EngineError> {
    config.validate()?;
    if bars.len() < MIN_BARS {
        return Err(EngineError::InsufficientData {
            required: MIN_BARS,
            actual: bars.len(),
        });
    }
    let prepared = preprocess(bars, config.ema_span, config.atr_span)?;
    Ok(run_prepared(&prepared, config))
}

/// Run the scan and simulation stages over an already-prepared series.
pub fn run_prepared(bars: &[PriceBar], config: &EngineConfig) -> BacktestReport {
    let mut diag = ScanDiagnostics {
        bar_count: bars.len(),
        ..ScanDiagnostics::default()
    };

    let detector = PivotDetector::new(bars);
    diag.pivots = detector.iter().count();

    let mut resolver = OrderBlockResolver::new(config.ob_lookback);
    let mut order_blocks = Vec::new();
    for brk in structure_breaks(bars, detector) {
        diag.structure_breaks += 1;
        match resolver.resolve(bars, &brk) {
            Resolution::Block(ob) => order_blocks.push(ob),
            Resolution::Duplicate => diag.duplicate_blocks += 1,
            Resolution::NoCandle => diag.breaks_without_block += 1,
        }
    }
    order_blocks.sort_by_key(|ob| (ob.bos_index, ob.ob_index, ob.direction));
    diag.order_blocks = order_blocks.len();

    let simulator = PositionSimulator::new(config.exit_scan_start);
    let mut trades = Vec::new();
    let mut open_trades = Vec::new();
    for ob in &order_blocks {
        if !config.trading_mode.allows(ob.direction) {
            diag.skipped_by_mode += 1;
            continue;
        }
        match scan_entry(bars, ob, config.entry_wait_bars, config.atr_threshold) {
            EntryScan::ZeroRisk => diag.zero_risk_rejections += 1,
            EntryScan::TimedOut => diag.entry_timeouts += 1,
            EntryScan::Filled(trade) => {
                diag.entries += 1;
                let trade = simulator.run(bars, trade);
                if trade.is_closed() {
                    trades.push(trade);
                } else {
                    open_trades.push(trade);
                }
            }
        }
    }

    let order_key = |t: &Trade| (t.entry_index, t.ob_index, t.bos_index, t.direction);
    trades.sort_by_key(order_key);
    open_trades.sort_by_key(order_key);
    diag.open_at_end = open_trades.len();

    let stats = BacktestStats::compute(&trades, open_trades.len());
    debug!(
        bars = diag.bar_count,
        pivots = diag.pivots,
        breaks = diag.structure_breaks,
        blocks = diag.order_blocks,
        entries = diag.entries,
        timeouts = diag.entry_timeouts,
        closed = stats.trade_count,
        open = diag.open_at_end,
        total_r = stats.total_r,
        "order-block backtest complete"
    );

    BacktestReport {
        trades,
        open_trades,
        order_blocks,
        stats,
        diagnostics: diag,
    }
}
