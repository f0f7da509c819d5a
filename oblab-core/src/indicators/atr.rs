//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), with the
//! first bar degenerating to high-low. Smoothed with the same exponential
//! scheme as the EMA (alpha = 2 / (span + 1), seeded with TR[0]).

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    span: usize,
    name: String,
}

impl Atr {
    pub fn new(span: usize) -> Self {
        Self {
            span: span.max(1),
            name: format!("atr_{span}"),
        }
    }
}

/// Compute the True Range series from bars.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());
    let mut prev_close: Option<f64> = None;
    for bar in bars {
        let range = bar.high - bar.low;
        let value = match prev_close {
            None => range,
            Some(pc) => range.max((bar.high - pc).abs()).max((bar.low - pc).abs()),
        };
        tr.push(value);
        prev_close = Some(bar.close);
    }
    tr
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&true_range(bars), self.span)
    }
}
