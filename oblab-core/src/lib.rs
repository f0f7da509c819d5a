//! OBLab Core: order-block detection and staged-exit backtest engine.
//!
//! This crate turns an OHLC series into synthetic trades:
//! - Indicator preprocessing (EMA trend filter, ATR volatility filter)
//! - 3-bar fractal pivots and breaks of structure
//! - Order-block resolution behind each break
//! - Mitigation entries at the block's mid-body
//! - Two-stage exits (partial at 1R, breakeven, 2R) with stop-first tie-breaks
//! - Aggregate R-multiple statistics
//!
//! Every run is a pure function of its input bars and `EngineConfig`.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
pub mod preprocess;
pub mod scan;
pub mod stats;

pub use config::{EngineConfig, ExitScanStart, TradingMode};
pub use domain::{
    Bar, Direction, ExitReason, OrderBlock, Pivot, PivotKind, PriceBar, StructureBreak, Trade,
    TradeStage,
};
pub use engine::{run_backtest, run_prepared, BacktestReport, ScanDiagnostics};
pub use error::EngineError;
pub use fingerprint::RunFingerprint;
pub use stats::{BacktestStats, QualityVerdict};
