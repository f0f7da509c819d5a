//! Bar: the fundamental market data unit, raw and indicator-enriched.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Raw OHLC bar as supplied by the data loader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(timestamp: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: finite, non-negative, open/close inside [low, high].
    pub fn is_sane(&self) -> bool {
        self.sanity_violation().is_none()
    }

    /// Describe the first OHLC sanity violation, if any.
    pub fn sanity_violation(&self) -> Option<String> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Some(format!("{name} is not a finite number ({value})"));
            }
            if value < 0.0 {
                return Some(format!("{name} is negative ({value})"));
            }
        }
        if self.low > self.high {
            return Some(format!("low {} above high {}", self.low, self.high));
        }
        if self.open < self.low || self.open > self.high {
            return Some(format!(
                "open {} outside [{}, {}]",
                self.open, self.low, self.high
            ));
        }
        if self.close < self.low || self.close > self.high {
            return Some(format!(
                "close {} outside [{}, {}]",
                self.close, self.low, self.high
            ));
        }
        None
    }

    /// Close above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// A bar with its trend (EMA) and volatility (ATR) readings attached.
///
/// Built once by the preprocessor and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub ema: f64,
    pub atr: f64,
}

impl PriceBar {
    pub fn from_bar(bar: &Bar, ema: f64, atr: f64) -> Self {
        Self {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            ema,
            atr,
        }
    }

    /// The raw OHLC part, without indicator readings.
    pub fn as_bar(&self) -> Bar {
        Bar::new(self.timestamp, self.open, self.high, self.low, self.close)
    }

    pub fn is_bullish(&self) -> bool {
        self.as_bar().is_bullish()
    }

    pub fn is_bearish(&self) -> bool {
        self.as_bar().is_bearish()
    }
}
