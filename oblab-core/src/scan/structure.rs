//! Break-of-structure scan.

use crate::domain::{Direction, Pivot, PriceBar, StructureBreak};

/// First bar after the pivot whose close takes it out, if any.
///
/// High pivots break on `close > value` (Bullish), Low pivots on
/// `close < value` (Bearish). Scanning stops at the first break, so a pivot
/// triggers at most once.
pub fn find_break(bars: &[PriceBar], pivot: &Pivot) -> Option<StructureBreak> {
    let direction = pivot.kind.break_direction();
    let start = pivot.index + 1;
    bars.get(start..)?
        .iter()
        .position(|bar| match direction {
            Direction::Bullish => bar.close > pivot.value,
            Direction::Bearish => bar.close < pivot.value,
        })
        .map(|offset| StructureBreak {
            pivot_index: pivot.index,
            pivot_value: pivot.value,
            break_index: start + offset,
            direction,
        })
}

/// Lazily map pivots to their first structure break, dropping unbroken ones.
pub fn structure_breaks<'a, I>(
    bars: &'a [PriceBar],
    pivots: I,
) -> impl Iterator<Item = StructureBreak> + 'a
where
    I: IntoIterator<Item = Pivot>,
    I::IntoIter: 'a,
{
    pivots
        .into_iter()
        .filter_map(move |pivot| find_break(bars, &pivot))
}
