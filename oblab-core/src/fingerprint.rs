//! Run fingerprinting: deterministic identification of a backtest run.
//!
//! - `config_hash`: BLAKE3 over the canonical JSON of the engine config.
//! - `dataset_hash`: BLAKE3 over every bar's timestamp and OHLC bits.
//! - `run_id`: BLAKE3 over both; identical inputs always produce the same id,
//!   so a caller-side result cache can key on it.

use crate::config::EngineConfig;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub config_hash: String,
    pub dataset_hash: String,
    pub run_id: String,
}

impl RunFingerprint {
    pub fn compute(config: &EngineConfig, bars: &[Bar]) -> Self {
        let config_hash = config_hash(config);
        let dataset_hash = dataset_hash(bars);
        let mut hasher = blake3::Hasher::new();
        hasher.update(config_hash.as_bytes());
        hasher.update(b":");
        hasher.update(dataset_hash.as_bytes());
        Self {
            run_id: hasher.finalize().to_hex().to_string(),
            config_hash,
            dataset_hash,
        }
    }
}

pub fn config_hash(config: &EngineConfig) -> String {
    // Struct fields serialize in declaration order, so the JSON is canonical.
    let json = serde_json::to_string(config).unwrap_or_default();
    blake3::hash(json.as_bytes()).to_hex().to_string()
}

pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(&bar.timestamp.and_utc().timestamp_millis().to_le_bytes());
        for value in [bar.open, bar.high, bar.low, bar.close] {
            hasher.update(&value.to_bits().to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
