//! Pivot: a 3-bar fractal extremum.

use super::direction::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotKind {
    High,
    Low,
}

impl PivotKind {
    /// Direction of the structure break that takes out this pivot.
    ///
    /// A close above a pivot high is a Bullish break; below a pivot low, Bearish.
    pub fn break_direction(self) -> Direction {
        match self {
            PivotKind::High => Direction::Bullish,
            PivotKind::Low => Direction::Bearish,
        }
    }
}

/// A pivot at `index` whose extreme (`high` for High, `low` for Low) is `value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub index: usize,
    pub kind: PivotKind,
    pub value: f64,
}
