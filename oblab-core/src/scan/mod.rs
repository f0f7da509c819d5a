//! Forward/backward scans over a prepared price series.
//!
//! Each stage is a lazy, restartable scan with early termination:
//! pivots → structure breaks → order blocks → mitigation entries.

pub mod mitigation;
pub mod order_block;
pub mod pivots;
pub mod structure;

pub use mitigation::{entry_qualifies, scan_entry, EntryScan};
pub use order_block::{resolve_order_block, OrderBlockResolver, Resolution};
pub use pivots::{detect_pivots, PivotDetector, Pivots};
pub use structure::{find_break, structure_breaks};

/// Build a prepared series from `(open, high, low, close)` tuples with
/// explicit indicator readings, one bar per day.
#[cfg(test)]
pub(crate) fn prepared(data: &[(f64, f64, f64, f64)], ema: f64, atr: f64) -> Vec<crate::domain::PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| crate::domain::PriceBar {
            timestamp: base + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            ema,
            atr,
        })
        .collect()
}
