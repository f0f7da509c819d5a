//! Aggregate statistics over closed trades, in R-multiples.
//!
//! Every metric is a pure function of the closed-trade list. Trades still open
//! at series end never enter these numbers; only their count is carried.

use crate::domain::Trade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub total_r: f64,
    /// Fraction of closed trades with `realized_r > 0` (0.0 with no trades).
    pub win_rate: f64,
    pub avg_r: f64,
    pub avg_win_r: f64,
    pub avg_loss_r: f64,
    pub profit_factor: f64,
    pub largest_win_r: f64,
    pub largest_loss_r: f64,
    /// Deepest peak-to-trough drop of the cumulative R curve (<= 0).
    pub max_drawdown_r: f64,
    pub max_consecutive_losses: usize,
    pub open_at_end: usize,
}

impl BacktestStats {
    /// Compute from closed trades in entry order.
    pub fn compute(closed: &[Trade], open_at_end: usize) -> Self {
        let rs: Vec<f64> = closed.iter().map(|t| t.realized_r).collect();
        let wins: Vec<f64> = rs.iter().copied().filter(|&r| r > 0.0).collect();
        let losses: Vec<f64> = rs.iter().copied().filter(|&r| r <= 0.0).collect();
        let total_r: f64 = rs.iter().sum();

        Self {
            trade_count: rs.len(),
            win_count: wins.len(),
            loss_count: losses.len(),
            total_r,
            win_rate: ratio(wins.len() as f64, rs.len()),
            avg_r: ratio(total_r, rs.len()),
            avg_win_r: ratio(wins.iter().sum(), wins.len()),
            avg_loss_r: ratio(losses.iter().sum(), losses.len()),
            profit_factor: profit_factor(&rs),
            largest_win_r: wins.iter().copied().fold(0.0, f64::max),
            largest_loss_r: losses.iter().copied().fold(0.0, f64::min),
            max_drawdown_r: max_drawdown_r(&equity_curve_r(closed)),
            max_consecutive_losses: max_consecutive_losses(&rs),
            open_at_end,
        }
    }
}

fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / count as f64
    }
}

/// Cumulative R after each closed trade.
pub fn equity_curve_r(closed: &[Trade]) -> Vec<f64> {
    closed
        .iter()
        .scan(0.0, |acc, t| {
            *acc += t.realized_r;
            Some(*acc)
        })
        .collect()
}

/// Largest drop from a running peak (starting flat at 0R), as a non-positive number.
pub fn max_drawdown_r(curve: &[f64]) -> f64 {
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for &eq in curve {
        peak = peak.max(eq);
        max_dd = max_dd.min(eq - peak);
    }
    max_dd
}

/// Gross winning R / gross losing R, capped at 100.0.
pub fn profit_factor(rs: &[f64]) -> f64 {
    if rs.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = rs.iter().filter(|&&r| r > 0.0).sum();
    let gross_loss: f64 = rs.iter().filter(|&&r| r < 0.0).map(|r| r.abs()).sum();
    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

/// Longest run of trades with `realized_r <= 0`.
pub fn max_consecutive_losses(rs: &[f64]) -> usize {
    let mut max_streak = 0;
    let mut current = 0;
    for &r in rs {
        if r <= 0.0 {
            current += 1;
            max_streak = max_streak.max(current);
        } else {
            current = 0;
        }
    }
    max_streak
}

/// Coarse quality grade of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityVerdict {
    Excellent,
    Good,
    Acceptable,
    Marginal,
    Poor,
    NoTrades,
}

impl QualityVerdict {
    pub fn grade(stats: &BacktestStats) -> Self {
        if stats.trade_count == 0 {
            return QualityVerdict::NoTrades;
        }
        let (wr, avg) = (stats.win_rate, stats.avg_r);
        if wr >= 0.60 && avg > 0.5 {
            QualityVerdict::Excellent
        } else if wr >= 0.55 && avg > 0.2 {
            QualityVerdict::Good
        } else if wr >= 0.50 && avg > 0.0 {
            QualityVerdict::Acceptable
        } else if wr >= 0.45 && avg > -0.2 {
            QualityVerdict::Marginal
        } else {
            QualityVerdict::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityVerdict::Excellent => "excellent",
            QualityVerdict::Good => "good",
            QualityVerdict::Acceptable => "acceptable",
            QualityVerdict::Marginal => "marginal",
            QualityVerdict::Poor => "poor",
            QualityVerdict::NoTrades => "no trades",
        }
    }
}
