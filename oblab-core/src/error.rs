//! Engine error taxonomy.
//!
//! Every variant is fatal to the affected backtest run. Conditions that merely
//! reduce the trade count (no pivots, no breaks, entry timeouts, zero-risk
//! blocks, trades open at series end) are never errors; they surface through
//! `ScanDiagnostics` instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("insufficient data: need at least {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("malformed bar at index {index}: {reason}")]
    MalformedBar { index: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
