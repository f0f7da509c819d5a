//! Staged-exit position simulator.
//!
//! State machine per trade:
//!
//! ```text
//! AwaitingTarget1 ──target1──▶ PartialClosed ──target2 / breakeven──▶ Closed
//!        └────────────────────stop────────────────────────────────────▶ Closed
//! ```
//!
//! A bar that touches both the active stop and the pending target resolves
//! as a stop hit. After the partial, evaluation resumes on the following bar
//! with the stop at entry.

use crate::config::ExitScanStart;
use crate::domain::{ExitReason, PriceBar, Trade, TradeStage};
use tracing::trace;

/// What a single bar did to a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarEvent {
    Nothing,
    PartialTaken,
    Closed(ExitReason),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PositionSimulator {
    scan_start: ExitScanStart,
}

impl PositionSimulator {
    pub fn new(scan_start: ExitScanStart) -> Self {
        Self { scan_start }
    }

    /// First bar index inspected for exits.
    pub fn first_exit_bar(&self, trade: &Trade) -> usize {
        match self.scan_start {
            ExitScanStart::NextBar => trade.entry_index + 1,
            ExitScanStart::EntryBar => trade.entry_index,
        }
    }

    /// Advance `trade` bar by bar until it closes or the series ends.
    ///
    /// A trade still open at the last bar is returned as-is: never marked to
    /// the last close.
    pub fn run(&self, bars: &[PriceBar], mut trade: Trade) -> Trade {
        for index in self.first_exit_bar(&trade)..bars.len() {
            if let BarEvent::Closed(_) = step(&mut trade, index, &bars[index]) {
                break;
            }
        }
        trade
    }
}

/// Apply one bar to an open trade.
pub fn step(trade: &mut Trade, index: usize, bar: &PriceBar) -> BarEvent {
    let direction = trade.direction;
    let stop_hit = direction.stop_touched(bar.low, bar.high, trade.active_stop);

    match trade.stage {
        TradeStage::AwaitingTarget1 => {
            if stop_hit {
                trade.close(index, bar.timestamp, ExitReason::StopLoss);
                trace!(entry = trade.entry_index, exit = index, "stopped out before target1");
                BarEvent::Closed(ExitReason::StopLoss)
            } else if direction.target_touched(bar.low, bar.high, trade.target1) {
                trade.take_partial(index);
                trace!(entry = trade.entry_index, bar = index, "target1 reached, stop to breakeven");
                BarEvent::PartialTaken
            } else {
                BarEvent::Nothing
            }
        }
        TradeStage::PartialClosed => {
            // The partial bar itself is not re-evaluated for the second stage.
            if trade.partial_index == Some(index) {
                return BarEvent::Nothing;
            }
            if stop_hit {
                trade.close(index, bar.timestamp, ExitReason::Breakeven);
                trace!(entry = trade.entry_index, exit = index, "breakeven stop hit");
                BarEvent::Closed(ExitReason::Breakeven)
            } else if direction.target_touched(bar.low, bar.high, trade.target2) {
                trade.close(index, bar.timestamp, ExitReason::Target2);
                trace!(entry = trade.entry_index, exit = index, "target2 reached");
                BarEvent::Closed(ExitReason::Target2)
            } else {
                BarEvent::Nothing
            }
        }
        TradeStage::Closed => BarEvent::Nothing,
    }
}
