//! StructureBreak: the first close beyond a pivot.

use super::direction::Direction;
use serde::{Deserialize, Serialize};

/// First bar after `pivot_index` whose close takes out `pivot_value`.
///
/// Invariant: `break_index > pivot_index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureBreak {
    pub pivot_index: usize,
    pub pivot_value: f64,
    pub break_index: usize,
    pub direction: Direction,
}
