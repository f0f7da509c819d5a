//! Indicator preprocessing: validate the raw series and attach EMA/ATR.

use crate::domain::{Bar, PriceBar};
use crate::error::EngineError;
use crate::indicators::{Atr, Ema, Indicator};

/// Check that the series is strictly ascending in time and every bar is sane.
///
/// The first offending bar is reported; nothing is repaired.
pub fn validate_bars(bars: &[Bar]) -> Result<(), EngineError> {
    for (index, bar) in bars.iter().enumerate() {
        if let Some(reason) = bar.sanity_violation() {
            return Err(EngineError::MalformedBar { index, reason });
        }
        if index > 0 {
            let prev = bars[index - 1].timestamp;
            if bar.timestamp <= prev {
                return Err(EngineError::MalformedBar {
                    index,
                    reason: format!(
                        "timestamp {} not after previous bar's {}",
                        bar.timestamp, prev
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Validate `bars` and compute the trend/volatility filters for every bar.
pub fn preprocess(
    bars: &[Bar],
    ema_span: usize,
    atr_span: usize,
) -> Result<Vec<PriceBar>, EngineError> {
    if ema_span == 0 || atr_span == 0 {
        return Err(EngineError::InvalidConfiguration(
            "ema_span and atr_span must be > 0".into(),
        ));
    }
    if bars.is_empty() {
        return Err(EngineError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    validate_bars(bars)?;

    let ema = Ema::new(ema_span).compute(bars);
    let atr = Atr::new(atr_span).compute(bars);
    debug_assert_eq!(ema.len(), bars.len());
    debug_assert_eq!(atr.len(), bars.len());

    Ok(bars
        .iter()
        .zip(ema)
        .zip(atr)
        .map(|((bar, ema), atr)| PriceBar::from_bar(bar, ema, atr))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn preprocess_fills_every_bar() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 11.5]);
        let out = preprocess(&bars, 3, 3).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].ema, 10.0);
        assert_eq!(out[0].atr, bars[0].high - bars[0].low);
        assert!(out.iter().all(|b| b.ema.is_finite() && b.atr.is_finite()));
        assert_eq!(out[2].close, 12.0);
        assert_eq!(out[2].timestamp, bars[2].timestamp);
    }

    #[test]
    fn empty_series_is_insufficient() {
        assert_eq!(
            preprocess(&[], 3, 3),
            Err(EngineError::InsufficientData {
                required: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn zero_span_is_invalid() {
        let bars = make_bars(&[10.0]);
        assert!(matches!(
            preprocess(&bars, 0, 3),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn duplicate_timestamp_is_malformed() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[2].timestamp = bars[1].timestamp;
        match preprocess(&bars, 3, 3) {
            Err(EngineError::MalformedBar { index, reason }) => {
                assert_eq!(index, 2);
                assert!(reason.contains("timestamp"));
            }
            other => panic!("expected MalformedBar, got {other:?}"),
        }
    }

    #[test]
    fn unsorted_timestamps_are_malformed() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars.swap(0, 1);
        assert!(matches!(
            validate_bars(&bars),
            Err(EngineError::MalformedBar { index: 1, .. })
        ));
    }

    #[test]
    fn nan_price_is_malformed() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[1].close = f64::NAN;
        assert!(matches!(
            validate_bars(&bars),
            Err(EngineError::MalformedBar { index: 1, .. })
        ));
    }

    #[test]
    fn low_above_high_is_malformed() {
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[0].low = bars[0].high + 1.0;
        assert!(matches!(
            validate_bars(&bars),
            Err(EngineError::MalformedBar { index: 0, .. })
        ));
    }
}
