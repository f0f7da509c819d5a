//! Backtesting engine: staged-exit simulation and per-series orchestration.

pub mod backtest;
pub mod simulator;

pub use backtest::{run_backtest, run_prepared, BacktestReport, ScanDiagnostics, MIN_BARS};
pub use simulator::{step, BarEvent, PositionSimulator};
