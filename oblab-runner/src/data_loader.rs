//! Bar loading from CSV files.
//!
//! Expected layout: a header row naming `timestamp,open,high,low,close`
//! (any case, any order, extra columns ignored), one bar per row in
//! ascending time order. Timestamps may be `YYYY-MM-DD`,
//! `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339 (converted to
//! UTC). Ordering and OHLC sanity are checked by the engine, not here.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use oblab_core::Bar;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const COLUMNS: [&str; 5] = ["timestamp", "open", "high", "low", "close"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: unrecognised timestamp '{value}'")]
    BadTimestamp { line: u64, value: String },

    #[error("line {line}: column '{column}' is not a number: '{value}'")]
    BadNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Load every bar from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = parse_csv(file)?;
    debug!(path = %path.display(), bars = bars.len(), "loaded csv");
    Ok(bars)
}

/// Parse bars from any CSV source.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut index = [0usize; 5];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(LoadError::MissingColumn(name))?;
    }
    let [ts_col, open_col, high_col, low_col, close_col] = index;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let field = |col: usize| record.get(col).unwrap_or("");

        let raw_ts = field(ts_col);
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::BadTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;
        let number = |col: usize, column: &'static str| {
            field(col).parse::<f64>().map_err(|_| LoadError::BadNumber {
                line,
                column,
                value: field(col).to_string(),
            })
        };

        bars.push(Bar::new(
            timestamp,
            number(open_col, "open")?,
            number(high_col, "high")?,
            number(low_col, "low")?,
            number(close_col, "close")?,
        ));
    }
    Ok(bars)
}

/// Parse one of the accepted timestamp layouts.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
