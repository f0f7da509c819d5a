//! TOML run configuration: engine parameters plus the list of pairs to test.
//!
//! ```toml
//! parallel = true
//!
//! [engine]
//! ob_lookback = 10
//! entry_wait_bars = 60
//!
//! [[pairs]]
//! name = "EURUSD"
//! path = "data/eurusd_h1.csv"
//! ```
//!
//! Relative pair paths are resolved against the config file's directory.

use oblab_core::{EngineConfig, EngineError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid engine settings: {0}")]
    Engine(#[from] EngineError),

    #[error("config lists no pairs")]
    NoPairs,

    #[error("pair '{0}' is listed more than once")]
    DuplicatePair(String),
}

/// One instrument: a display name and its CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    pub name: String,
    pub path: PathBuf,
}

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub pairs: Vec<PairConfig>,

    /// Run pairs on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Directory relative pair paths are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl BacktestConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.pairs.is_empty() {
            return Err(ConfigError::NoPairs);
        }
        let mut seen = BTreeSet::new();
        for pair in &self.pairs {
            if !seen.insert(pair.name.as_str()) {
                return Err(ConfigError::DuplicatePair(pair.name.clone()));
            }
        }
        Ok(())
    }

    /// Where to read `pair`'s bars from.
    pub fn resolve_path(&self, pair: &PairConfig) -> PathBuf {
        match &self.base_dir {
            Some(dir) if pair.path.is_relative() => dir.join(&pair.path),
            _ => pair.path.clone(),
        }
    }
}
