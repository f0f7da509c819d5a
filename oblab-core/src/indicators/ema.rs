//! Exponential Moving Average (EMA).
//!
//! Recursive, non-adjusted form: EMA[0] = close[0],
//! EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1).
//! Defined from the first bar; there is no warmup gap.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    /// `span` must be >= 1; `EngineConfig::validate` guarantees it for engine use.
    pub fn new(span: usize) -> Self {
        Self {
            span: span.max(1),
            name: format!("ema_{span}"),
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.span)
    }
}

/// Exponentially smooth an arbitrary series with `alpha = 2 / (span + 1)`.
///
/// Shared by the EMA and the ATR so both use the same smoothing scheme.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };

    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let mut prev = first;
    result.push(first);
    for &v in &values[1..] {
        let next = alpha * v + (1.0 - alpha) * prev;
        result.push(next);
        prev = next;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_span_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5
        // EMA[0] = 10
        // EMA[1] = 0.5*11 + 0.5*10 = 10.5
        // EMA[2] = 0.5*12 + 0.5*10.5 = 11.25
        // EMA[3] = 0.5*13 + 0.5*11.25 = 12.125
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = Ema::new(3).compute(&bars);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_has_no_lookahead() {
        let closes = [10.0, 12.0, 9.0, 14.0, 11.0, 15.0];
        let full = ema_of_series(&closes, 4);
        let truncated = ema_of_series(&closes[..4], 4);
        for i in 0..4 {
            assert_approx(full[i], truncated[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_of_empty_series_is_empty() {
        assert!(ema_of_series(&[], 5).is_empty());
    }

    #[test]
    fn ema_name_includes_span() {
        assert_eq!(Ema::new(50).name(), "ema_50");
    }
}
