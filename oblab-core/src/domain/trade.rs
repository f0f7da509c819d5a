//! Trade: a two-stage position opened at an order block's mid-body.
//!
//! Lifecycle: `AwaitingTarget1 → PartialClosed → Closed`, or
//! `AwaitingTarget1 → Closed` on an early stop-out. Transitions are only
//! reachable through [`Trade::take_partial`] and [`Trade::close`], which the
//! position simulator drives.

use super::direction::Direction;
use super::order_block::OrderBlock;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Fraction of the position closed at the first target.
pub const PARTIAL_FRACTION: f64 = 0.5;
/// First target distance, in R.
pub const TARGET1_R: f64 = 1.0;
/// Second target distance, in R.
pub const TARGET2_R: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStage {
    AwaitingTarget1,
    PartialClosed,
    Closed,
}

impl TradeStage {
    pub fn is_terminal(self) -> bool {
        self == TradeStage::Closed
    }

    /// Legal transitions of the staged-exit state machine.
    pub fn can_transition_to(self, next: TradeStage) -> bool {
        matches!(
            (self, next),
            (TradeStage::AwaitingTarget1, TradeStage::PartialClosed)
                | (TradeStage::AwaitingTarget1, TradeStage::Closed)
                | (TradeStage::PartialClosed, TradeStage::Closed)
        )
    }
}

/// What closed the (remaining) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    /// Initial stop hit before the first target: full loss.
    StopLoss,
    /// Stop moved to entry was hit after the partial.
    Breakeven,
    /// Second target reached on the remaining half.
    Target2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Origin ──
    pub direction: Direction,
    pub ob_index: usize,
    pub bos_index: usize,

    // ── Entry ──
    pub entry_index: usize,
    pub entry_timestamp: NaiveDateTime,
    pub entry_price: f64,
    /// Initial protective stop (the order block's extreme).
    pub stop_price: f64,
    /// One R: `|entry_price - stop_price|`, always > 0.
    pub risk: f64,
    pub target1: f64,
    pub target2: f64,

    // ── State ──
    pub stage: TradeStage,
    /// Stop currently protecting the open remainder.
    pub active_stop: f64,
    /// R realized so far; final once `stage` is `Closed`.
    pub realized_r: f64,

    // ── Exits ──
    pub partial_index: Option<usize>,
    pub exit_index: Option<usize>,
    pub exit_timestamp: Option<NaiveDateTime>,
    pub exit_reason: Option<ExitReason>,
}

impl Trade {
    /// Open a trade filled at the block's mid-body.
    ///
    /// Returns `None` for a zero-risk block (`mid_body == stop_level`), or a
    /// block whose levels are not finite.
    pub fn open(ob: &OrderBlock, entry_index: usize, entry_timestamp: NaiveDateTime) -> Option<Self> {
        let entry_price = ob.mid_body;
        let stop_price = ob.stop_level;
        let risk = (entry_price - stop_price).abs();
        if !(risk > 0.0 && risk.is_finite()) {
            return None;
        }
        Some(Self {
            direction: ob.direction,
            ob_index: ob.ob_index,
            bos_index: ob.bos_index,
            entry_index,
            entry_timestamp,
            entry_price,
            stop_price,
            risk,
            target1: ob.direction.target(entry_price, risk, TARGET1_R),
            target2: ob.direction.target(entry_price, risk, TARGET2_R),
            stage: TradeStage::AwaitingTarget1,
            active_stop: stop_price,
            realized_r: 0.0,
            partial_index: None,
            exit_index: None,
            exit_timestamp: None,
            exit_reason: None,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn is_winner(&self) -> bool {
        self.is_closed() && self.realized_r > 0.0
    }

    /// Bars from entry to final exit (None while open).
    pub fn bars_held(&self) -> Option<usize> {
        self.exit_index.map(|exit| exit - self.entry_index)
    }

    /// Close `PARTIAL_FRACTION` at target1 and move the stop to entry.
    pub(crate) fn take_partial(&mut self, index: usize) {
        debug_assert!(self.stage.can_transition_to(TradeStage::PartialClosed));
        self.stage = TradeStage::PartialClosed;
        self.realized_r = PARTIAL_FRACTION * TARGET1_R;
        self.active_stop = self.entry_price;
        self.partial_index = Some(index);
    }

    /// Close whatever remains of the position.
    pub(crate) fn close(&mut self, index: usize, timestamp: NaiveDateTime, reason: ExitReason) {
        debug_assert!(self.stage.can_transition_to(TradeStage::Closed));
        let contribution = match (self.stage, reason) {
            (TradeStage::AwaitingTarget1, _) => -1.0,
            (_, ExitReason::Target2) => (1.0 - PARTIAL_FRACTION) * TARGET2_R,
            _ => 0.0,
        };
        self.realized_r += contribution;
        self.stage = TradeStage::Closed;
        self.exit_index = Some(index);
        self.exit_timestamp = Some(timestamp);
        self.exit_reason = Some(reason);
    }
}
