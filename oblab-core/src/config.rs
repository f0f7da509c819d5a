//! Engine configuration.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Which bar the position simulator inspects first after a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitScanStart {
    /// Exits are evaluated from the bar after the entry bar. The entry bar's
    /// intrabar path relative to the fill is unknown, so it is not used.
    #[default]
    NextBar,
    /// The entry bar itself is also checked for stop/target touches.
    EntryBar,
}

/// Trading mode: which directions are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingMode {
    LongOnly,
    ShortOnly,
    #[default]
    LongShort,
}

impl TradingMode {
    pub fn allows(self, direction: crate::domain::Direction) -> bool {
        use crate::domain::Direction;
        match self {
            TradingMode::LongShort => true,
            TradingMode::LongOnly => direction == Direction::Bullish,
            TradingMode::ShortOnly => direction == Direction::Bearish,
        }
    }
}

/// Parameters of a single order-block backtest.
///
/// Every field has a default, so a partial TOML/JSON table deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// EMA span for the trend filter.
    pub ema_span: usize,
    /// ATR span for the volatility filter.
    pub atr_span: usize,
    /// How many bars before the break to search for the order-block candle.
    pub ob_lookback: usize,
    /// Bars after the break during which a mitigation entry may trigger.
    pub entry_wait_bars: usize,
    /// Minimum ATR at the entry bar, in price units.
    pub atr_threshold: f64,
    pub exit_scan_start: ExitScanStart,
    pub trading_mode: TradingMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ema_span: 50,
            atr_span: 14,
            ob_lookback: 10,
            entry_wait_bars: 60,
            atr_threshold: 0.0060,
            exit_scan_start: ExitScanStart::NextBar,
            trading_mode: TradingMode::LongShort,
        }
    }
}

impl EngineConfig {
    /// Reject non-positive spans/windows and a negative or non-finite threshold.
    pub fn validate(&self) -> Result<(), EngineError> {
        let windows = [
            ("ema_span", self.ema_span),
            ("atr_span", self.atr_span),
            ("ob_lookback", self.ob_lookback),
            ("entry_wait_bars", self.entry_wait_bars),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(EngineError::InvalidConfiguration(format!(
                    "{name} must be > 0"
                )));
            }
        }
        if !self.atr_threshold.is_finite() || self.atr_threshold < 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "atr_threshold must be a finite value >= 0, got {}",
                self.atr_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let config = EngineConfig {
            entry_wait_bars: 0,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("entry_wait_bars"));
    }

    #[test]
    fn negative_or_nan_threshold_is_rejected() {
        for threshold in [-0.1, f64::NAN, f64::INFINITY] {
            let config = EngineConfig {
                atr_threshold: threshold,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(EngineError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn zero_threshold_is_allowed() {
        let config = EngineConfig {
            atr_threshold: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"ob_lookback": 3, "exit_scan_start": "entry_bar"}"#).unwrap();
        assert_eq!(config.ob_lookback, 3);
        assert_eq!(config.exit_scan_start, ExitScanStart::EntryBar);
        assert_eq!(config.ema_span, 50);
    }

    #[test]
    fn trading_mode_filters_directions() {
        assert!(TradingMode::LongShort.allows(Direction::Bearish));
        assert!(TradingMode::LongOnly.allows(Direction::Bullish));
        assert!(!TradingMode::LongOnly.allows(Direction::Bearish));
        assert!(!TradingMode::ShortOnly.allows(Direction::Bullish));
    }
}
