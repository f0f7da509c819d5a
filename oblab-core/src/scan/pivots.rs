//! 3-bar fractal pivot detection.
//!
//! A High pivot at `i` has `high[i] >= high[i-1]` and `high[i] >= high[i+1]`;
//! a Low pivot mirrors that on lows. Ties count, so flat tops and bottoms are
//! kept. The first and last bars can never be pivots.

use crate::domain::{Pivot, PivotKind, PriceBar};

/// Restartable pivot source over a borrowed series.
#[derive(Debug, Clone, Copy)]
pub struct PivotDetector<'a> {
    bars: &'a [PriceBar],
}

impl<'a> PivotDetector<'a> {
    pub fn new(bars: &'a [PriceBar]) -> Self {
        Self { bars }
    }

    /// A fresh scan from the first interior bar. Each call starts over.
    pub fn iter(&self) -> Pivots<'a> {
        Pivots {
            bars: self.bars,
            index: 1,
            next_kind: PivotKind::High,
        }
    }
}

impl<'a> IntoIterator for PivotDetector<'a> {
    type Item = Pivot;
    type IntoIter = Pivots<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy pivot scan. Yields in index order; at a bar that is both a High and
/// a Low pivot (outside bar), High comes first.
#[derive(Debug, Clone)]
pub struct Pivots<'a> {
    bars: &'a [PriceBar],
    index: usize,
    next_kind: PivotKind,
}

impl Iterator for Pivots<'_> {
    type Item = Pivot;

    fn next(&mut self) -> Option<Pivot> {
        while self.index + 1 < self.bars.len() {
            let i = self.index;
            let (prev, cur, next) = (&self.bars[i - 1], &self.bars[i], &self.bars[i + 1]);
            match self.next_kind {
                PivotKind::High => {
                    self.next_kind = PivotKind::Low;
                    if cur.high >= prev.high && cur.high >= next.high {
                        return Some(Pivot {
                            index: i,
                            kind: PivotKind::High,
                            value: cur.high,
                        });
                    }
                }
                PivotKind::Low => {
                    self.next_kind = PivotKind::High;
                    self.index += 1;
                    if cur.low <= prev.low && cur.low <= next.low {
                        return Some(Pivot {
                            index: i,
                            kind: PivotKind::Low,
                            value: cur.low,
                        });
                    }
                }
            }
        }
        None
    }
}

/// Collect every pivot in the series.
pub fn detect_pivots(bars: &[PriceBar]) -> Vec<Pivot> {
    PivotDetector::new(bars).iter().collect()
}
