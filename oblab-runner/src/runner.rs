//! Backtest runner: wires loading, the engine and fingerprinting per pair.
//!
//! Entry points:
//! - `run_pair()`: one named series already in memory.
//! - `run_pairs()`: many in-memory series, optionally on the rayon pool.
//! - `run_from_config()`: loads every pair listed in a `BacktestConfig`.
//!
//! A failing pair never aborts the batch; it becomes `PairOutcome::Failed`.
//! Outcomes always come back in input order, parallel or not.

use oblab_core::{run_backtest, BacktestReport, Bar, EngineConfig, EngineError, QualityVerdict, RunFingerprint};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BacktestConfig, PairConfig};
use crate::data_loader::{load_csv, LoadError};
use crate::summary::SummaryTable;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("pair '{pair}': {source}")]
    Data {
        pair: String,
        #[source]
        source: LoadError,
    },
    #[error("pair '{pair}': {source}")]
    Engine {
        pair: String,
        #[source]
        source: EngineError,
    },
}

/// A named series to backtest.
#[derive(Debug, Clone)]
pub struct PairInput {
    pub name: String,
    pub bars: Vec<Bar>,
}

/// Successful run over one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub pair: String,
    pub bar_count: usize,
    pub fingerprint: RunFingerprint,
    pub verdict: QualityVerdict,
    pub report: BacktestReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairOutcome {
    Completed(PairResult),
    Failed { pair: String, error: String },
}

impl PairOutcome {
    pub fn pair(&self) -> &str {
        match self {
            PairOutcome::Completed(r) => &r.pair,
            PairOutcome::Failed { pair, .. } => pair,
        }
    }

    pub fn result(&self) -> Option<&PairResult> {
        match self {
            PairOutcome::Completed(r) => Some(r),
            PairOutcome::Failed { .. } => None,
        }
    }

    fn from_run(pair: &str, run: Result<PairResult, RunError>) -> Self {
        match run {
            Ok(result) => PairOutcome::Completed(result),
            Err(e) => {
                warn!(pair, error = %e, "pair failed");
                PairOutcome::Failed {
                    pair: pair.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Everything a batch produces: per-pair outcomes plus the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub pairs: Vec<PairOutcome>,
    pub summary: SummaryTable,
}

impl BatchReport {
    pub fn new(pairs: Vec<PairOutcome>) -> Self {
        let summary = SummaryTable::from_results(pairs.iter().filter_map(PairOutcome::result));
        Self { pairs, summary }
    }

    pub fn failed_count(&self) -> usize {
        self.pairs.iter().filter(|o| o.result().is_none()).count()
    }
}

/// Run the engine over one in-memory series.
pub fn run_pair(name: &str, bars: &[Bar], config: &EngineConfig) -> Result<PairResult, RunError> {
    let report = run_backtest(bars, config).map_err(|source| RunError::Engine {
        pair: name.to_string(),
        source,
    })?;
    let verdict = QualityVerdict::grade(&report.stats);
    info!(
        pair = name,
        bars = bars.len(),
        trades = report.stats.trade_count,
        open = report.stats.open_at_end,
        total_r = report.stats.total_r,
        win_rate = report.stats.win_rate,
        verdict = verdict.label(),
        "pair complete"
    );
    Ok(PairResult {
        pair: name.to_string(),
        bar_count: bars.len(),
        fingerprint: RunFingerprint::compute(config, bars),
        verdict,
        report,
    })
}

/// Run every input; one outcome per input, in input order.
pub fn run_pairs(inputs: &[PairInput], config: &EngineConfig, parallel: bool) -> Vec<PairOutcome> {
    for_each_pair(inputs, parallel, |input| {
        PairOutcome::from_run(&input.name, run_pair(&input.name, &input.bars, config))
    })
}

/// Load and run every pair named in `config`.
pub fn run_from_config(config: &BacktestConfig) -> BatchReport {
    info!(pairs = config.pairs.len(), parallel = config.parallel, "starting batch");
    let outcomes = for_each_pair(&config.pairs, config.parallel, |pair| {
        PairOutcome::from_run(&pair.name, load_and_run(config, pair))
    });
    let batch = BatchReport::new(outcomes);
    info!(
        completed = batch.summary.rows.len(),
        failed = batch.failed_count(),
        "batch complete"
    );
    batch
}

fn load_and_run(config: &BacktestConfig, pair: &PairConfig) -> Result<PairResult, RunError> {
    let path = config.resolve_path(pair);
    let bars = load_csv(&path).map_err(|source| RunError::Data {
        pair: pair.name.clone(),
        source,
    })?;
    run_pair(&pair.name, &bars, &config.engine)
}

fn for_each_pair<T, F>(items: &[T], parallel: bool, f: F) -> Vec<PairOutcome>
where
    T: Sync,
    F: Fn(&T) -> PairOutcome + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}
