//! Cross-pair summary table.

use oblab_core::QualityVerdict;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::runner::PairResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub pair: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_r: f64,
    /// Fraction, 0..1.
    pub win_rate: f64,
    pub avg_r: f64,
    pub verdict: QualityVerdict,
}

/// Mean of each numeric column across pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryAverage {
    pub trades: f64,
    pub wins: f64,
    pub losses: f64,
    pub total_r: f64,
    pub win_rate: f64,
    pub avg_r: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
    /// `None` when there are no rows.
    pub average: Option<SummaryAverage>,
}

impl SummaryTable {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a PairResult>) -> Self {
        let rows: Vec<SummaryRow> = results
            .into_iter()
            .map(|r| {
                let s = &r.report.stats;
                SummaryRow {
                    pair: r.pair.clone(),
                    trades: s.trade_count,
                    wins: s.win_count,
                    losses: s.loss_count,
                    total_r: s.total_r,
                    win_rate: s.win_rate,
                    avg_r: s.avg_r,
                    verdict: r.verdict,
                }
            })
            .collect();
        let average = average_of(&rows);
        Self { rows, average }
    }
}

fn average_of(rows: &[SummaryRow]) -> Option<SummaryAverage> {
    if rows.is_empty() {
        return None;
    }
    let n = rows.len() as f64;
    let mean = |f: fn(&SummaryRow) -> f64| rows.iter().map(f).sum::<f64>() / n;
    Some(SummaryAverage {
        trades: mean(|r| r.trades as f64),
        wins: mean(|r| r.wins as f64),
        losses: mean(|r| r.losses as f64),
        total_r: mean(|r| r.total_r),
        win_rate: mean(|r| r.win_rate),
        avg_r: mean(|r| r.avg_r),
    })
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>7} {:>6} {:>6} {:>9} {:>7} {:>8}  verdict",
            "pair", "trades", "wins", "losses", "total_r", "win%", "avg_r"
        )?;
        for r in &self.rows {
            writeln!(
                f,
                "{:<12} {:>7} {:>6} {:>6} {:>9.2} {:>6.1}% {:>8.3}  {}",
                r.pair,
                r.trades,
                r.wins,
                r.losses,
                r.total_r,
                r.win_rate * 100.0,
                r.avg_r,
                r.verdict.label()
            )?;
        }
        if let Some(a) = &self.average {
            writeln!(
                f,
                "{:<12} {:>7.1} {:>6.1} {:>6.1} {:>9.2} {:>6.1}% {:>8.3}",
                "AVERAGE",
                a.trades,
                a.wins,
                a.losses,
                a.total_r,
                a.win_rate * 100.0,
                a.avg_r
            )?;
        }
        Ok(())
    }
}
