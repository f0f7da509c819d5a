//! OrderBlock: the last opposite-coloured candle before a structure break.

use super::direction::Direction;
use serde::{Deserialize, Serialize};

/// Supply/demand zone derived from a structure break.
///
/// `mid_body` is the re-entry level; `stop_level` is the candle's extreme on
/// the losing side (`ob_low` for Bullish, `ob_high` for Bearish).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    pub direction: Direction,
    pub ob_index: usize,
    pub bos_index: usize,
    pub ob_open: f64,
    pub ob_close: f64,
    pub ob_high: f64,
    pub ob_low: f64,
    pub mid_body: f64,
    pub stop_level: f64,
}

impl OrderBlock {
    /// Distance between the re-entry level and the stop: one R for a trade
    /// filled at `mid_body`.
    pub fn risk(&self) -> f64 {
        (self.mid_body - self.stop_level).abs()
    }
}
