//! OBLab Runner: multi-pair orchestration on top of `oblab-core`.
//!
//! This crate provides:
//! - TOML batch configuration (engine parameters + pair list)
//! - CSV bar loading with flexible timestamp parsing
//! - Deterministic synthetic series
//! - Per-pair runs, sequential or on the rayon pool, with fingerprints
//! - Cross-pair summary table with an AVERAGE row

pub mod config;
pub mod data_loader;
pub mod runner;
pub mod summary;
pub mod synthetic;

pub use config::{BacktestConfig, ConfigError, PairConfig};
pub use data_loader::{load_csv, parse_csv, LoadError};
pub use runner::{
    run_from_config, run_pair, run_pairs, BatchReport, PairInput, PairOutcome, PairResult,
    RunError,
};
pub use summary::{SummaryAverage, SummaryRow, SummaryTable};
pub use synthetic::generate_bars;
