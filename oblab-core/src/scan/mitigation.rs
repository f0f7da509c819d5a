//! Mitigation entry: the first re-test of an order block's mid-body that
//! passes candle, trend, and volatility confirmation.

use crate::domain::{Direction, OrderBlock, PriceBar, Trade};

/// Outcome of waiting for a mitigation entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryScan {
    /// Entry filled at the block's mid-body on the first qualifying bar.
    Filled(Trade),
    /// No bar qualified within the wait window (or the series ended first).
    TimedOut,
    /// One R is zero or not finite, so no trade is possible.
    ZeroRisk,
}

/// Whether `bar` confirms a mitigation entry into `ob`.
///
/// All four must hold (Bullish shown, Bearish mirrored):
/// - re-entry: `low <= mid_body`
/// - candle: `close > open` and `close > mid_body`
/// - trend: `ema < close`
/// - volatility: `atr >= atr_threshold`
pub fn entry_qualifies(bar: &PriceBar, ob: &OrderBlock, atr_threshold: f64) -> bool {
    let level = ob.mid_body;
    let directional = match ob.direction {
        Direction::Bullish => {
            bar.low <= level && bar.is_bullish() && bar.close > level && bar.ema < bar.close
        }
        Direction::Bearish => {
            bar.high >= level && bar.is_bearish() && bar.close < level && bar.ema > bar.close
        }
    };
    directional && bar.atr >= atr_threshold
}

/// Scan `bos_index+1 ..= bos_index+entry_wait_bars` for the first qualifying bar.
pub fn scan_entry(
    bars: &[PriceBar],
    ob: &OrderBlock,
    entry_wait_bars: usize,
    atr_threshold: f64,
) -> EntryScan {
    let risk = ob.risk();
    if !(risk > 0.0 && risk.is_finite()) {
        return EntryScan::ZeroRisk;
    }

    let start = ob.bos_index + 1;
    let end = ob.bos_index.saturating_add(entry_wait_bars).saturating_add(1).min(bars.len());
    if start >= end {
        return EntryScan::TimedOut;
    }

    let hit = (start..end).find(|&i| entry_qualifies(&bars[i], ob, atr_threshold));
    match hit.and_then(|i| Trade::open(ob, i, bars[i].timestamp)) {
        Some(trade) => EntryScan::Filled(trade),
        None if hit.is_some() => EntryScan::ZeroRisk,
        None => EntryScan::TimedOut,
    }
}
