//! OBLab CLI: order-block backtests from TOML configs, CSV files, or synthetic series.
//!
//! Commands:
//! - `run`: every pair listed in a TOML config, optionally in parallel
//! - `pair`: a single CSV file
//! - `synthetic`: a deterministic generated series
//!
//! Results are pretty JSON on stdout (or `--output`); logs and the summary
//! table go to stderr. Set `RUST_LOG` to change verbosity.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use oblab_core::{EngineConfig, ExitScanStart, TradingMode};
use oblab_runner::{
    generate_bars, load_csv, run_from_config, run_pair, BacktestConfig, PairResult, SummaryTable,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "oblab",
    about = "OBLab CLI: order-block detection and staged-exit backtests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest every pair listed in a TOML config file.
    Run {
        /// Path to the TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Run pairs one after another instead of on the thread pool.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Write JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Backtest a single CSV file.
    Pair {
        /// CSV with timestamp,open,high,low,close columns.
        #[arg(long)]
        csv: PathBuf,

        /// Display name. Defaults to the file stem.
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        engine: EngineArgs,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Backtest a deterministic synthetic series.
    Synthetic {
        #[arg(long, default_value_t = 5_000)]
        bars: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value = "SYNTH")]
        name: String,

        #[command(flatten)]
        engine: EngineArgs,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Engine overrides; anything not given keeps its default.
#[derive(Args, Debug, Default)]
struct EngineArgs {
    #[arg(long)]
    ema_span: Option<usize>,

    #[arg(long)]
    atr_span: Option<usize>,

    #[arg(long)]
    ob_lookback: Option<usize>,

    #[arg(long)]
    entry_wait_bars: Option<usize>,

    /// Minimum ATR at entry, in price units.
    #[arg(long)]
    atr_threshold: Option<f64>,

    #[arg(long, value_enum)]
    exit_scan_start: Option<ScanStartArg>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScanStartArg {
    NextBar,
    EntryBar,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    LongShort,
    LongOnly,
    ShortOnly,
}

impl EngineArgs {
    fn into_config(self) -> Result<EngineConfig> {
        let d = EngineConfig::default();
        let config = EngineConfig {
            ema_span: self.ema_span.unwrap_or(d.ema_span),
            atr_span: self.atr_span.unwrap_or(d.atr_span),
            ob_lookback: self.ob_lookback.unwrap_or(d.ob_lookback),
            entry_wait_bars: self.entry_wait_bars.unwrap_or(d.entry_wait_bars),
            atr_threshold: self.atr_threshold.unwrap_or(d.atr_threshold),
            exit_scan_start: match self.exit_scan_start {
                Some(ScanStartArg::NextBar) => ExitScanStart::NextBar,
                Some(ScanStartArg::EntryBar) => ExitScanStart::EntryBar,
                None => d.exit_scan_start,
            },
            trading_mode: match self.mode {
                Some(ModeArg::LongShort) => TradingMode::LongShort,
                Some(ModeArg::LongOnly) => TradingMode::LongOnly,
                Some(ModeArg::ShortOnly) => TradingMode::ShortOnly,
                None => d.trading_mode,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            sequential,
            output,
        } => cmd_run(&config, sequential, output.as_deref()),
        Commands::Pair {
            csv,
            name,
            engine,
            output,
        } => cmd_pair(&csv, name, engine, output.as_deref()),
        Commands::Synthetic {
            bars,
            seed,
            name,
            engine,
            output,
        } => cmd_synthetic(bars, seed, &name, engine, output.as_deref()),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))
}

fn cmd_run(config_path: &Path, sequential: bool, output: Option<&Path>) -> Result<()> {
    let mut config = BacktestConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if sequential {
        config.parallel = false;
    }

    let batch = run_from_config(&config);
    eprint!("{}", batch.summary);
    write_output(&batch, output)?;

    if batch.summary.rows.is_empty() {
        bail!("all {} pairs failed", batch.pairs.len());
    }
    Ok(())
}

fn cmd_pair(csv: &Path, name: Option<String>, engine: EngineArgs, output: Option<&Path>) -> Result<()> {
    let config = engine.into_config()?;
    let name = name.unwrap_or_else(|| {
        csv.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "PAIR".into())
    });
    let bars = load_csv(csv).with_context(|| format!("loading {}", csv.display()))?;
    let result = run_pair(&name, &bars, &config)?;
    finish_single(&result, output)
}

fn cmd_synthetic(
    bars: usize,
    seed: u64,
    name: &str,
    engine: EngineArgs,
    output: Option<&Path>,
) -> Result<()> {
    let config = engine.into_config()?;
    info!(name, bars, seed, "generating synthetic series");
    let series = generate_bars(name, bars, seed);
    let result = run_pair(name, &series, &config)?;
    finish_single(&result, output)
}

fn finish_single(result: &PairResult, output: Option<&Path>) -> Result<()> {
    eprint!("{}", SummaryTable::from_results(std::iter::once(result)));
    write_output(result, output)
}

fn write_output<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
