//! Order-block resolution: walk back from a break to the last opposite-coloured candle.

use crate::domain::{Direction, OrderBlock, PriceBar, StructureBreak};
use std::collections::BTreeSet;

/// Find the order block behind a structure break.
///
/// Scans `bos_index-1` down to `max(0, bos_index-lookback)`, both bounds
/// inclusive, for the nearest bearish candle (Bullish break) or bullish
/// candle (Bearish break). Dojis never qualify. `None` when the window holds
/// no such candle; the break is then simply unused.
pub fn resolve_order_block(
    bars: &[PriceBar],
    brk: &StructureBreak,
    lookback: usize,
) -> Option<OrderBlock> {
    let floor = brk.break_index.saturating_sub(lookback);
    let upper = brk.break_index.min(bars.len());
    let ob_index = (floor..upper).rev().find(|&i| match brk.direction {
        Direction::Bullish => bars[i].is_bearish(),
        Direction::Bearish => bars[i].is_bullish(),
    })?;

    let candle = &bars[ob_index];
    let stop_level = match brk.direction {
        Direction::Bullish => candle.low,
        Direction::Bearish => candle.high,
    };
    Some(OrderBlock {
        direction: brk.direction,
        ob_index,
        bos_index: brk.break_index,
        ob_open: candle.open,
        ob_close: candle.close,
        ob_high: candle.high,
        ob_low: candle.low,
        mid_body: (candle.open + candle.close) / 2.0,
        stop_level,
    })
}

/// Outcome of resolving one break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Block(OrderBlock),
    /// Another break already produced this exact block.
    Duplicate,
    /// No qualifying candle inside the lookback window.
    NoCandle,
}

/// Resolver that remembers the blocks it has produced within one run.
///
/// Two pivots broken by the same bar usually resolve to the same candle; the
/// block is emitted once.
#[derive(Debug, Clone)]
pub struct OrderBlockResolver {
    lookback: usize,
    seen: BTreeSet<(Direction, usize, usize)>,
}

impl OrderBlockResolver {
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback,
            seen: BTreeSet::new(),
        }
    }

    pub fn resolve(&mut self, bars: &[PriceBar], brk: &StructureBreak) -> Resolution {
        match resolve_order_block(bars, brk, self.lookback) {
            None => Resolution::NoCandle,
            Some(ob) => {
                if self.seen.insert((ob.direction, ob.ob_index, ob.bos_index)) {
                    Resolution::Block(ob)
                } else {
                    Resolution::Duplicate
                }
            }
        }
    }
}
