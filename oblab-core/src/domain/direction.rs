//! Trade direction and the price comparisons that depend on it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a structure break, order block, and the trade it spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    /// +1.0 for Bullish, -1.0 for Bearish.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Bullish => 1.0,
            Direction::Bearish => -1.0,
        }
    }

    /// Price `r_multiple` risk units from `entry` in the profitable direction.
    pub fn target(self, entry: f64, risk: f64, r_multiple: f64) -> f64 {
        entry + self.sign() * risk * r_multiple
    }

    /// Whether a bar with range `[low, high]` reaches a protective stop at `level`.
    pub fn stop_touched(self, low: f64, high: f64, level: f64) -> bool {
        match self {
            Direction::Bullish => low <= level,
            Direction::Bearish => high >= level,
        }
    }

    /// Whether a bar with range `[low, high]` reaches a profit target at `level`.
    pub fn target_touched(self, low: f64, high: f64, level: f64) -> bool {
        match self {
            Direction::Bullish => high >= level,
            Direction::Bearish => low <= level,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "Bullish"),
            Direction::Bearish => write!(f, "Bearish"),
        }
    }
}
