//! Pure, stateless trade metrics. Every function here recomputes from
//! scratch on each call; division-by-zero cases are defined as 0 by
//! convention rather than raised.

use serde::{Deserialize, Serialize};

use crate::models::{TimeOfDay, Trade};

/// Contract-size scalar converting per-share option price to per-contract value.
pub const OPTION_MULTIPLIER: f64 = 100.0;

/// Annual risk-free rate used when the caller does not supply one.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Trading-day convention for scaling an annual rate to daily returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Realized P&L of a closed options position.
pub fn options_pnl(entry_price: f64, exit_price: f64, quantity: i32, commission: f64) -> f64 {
    (exit_price - entry_price) * quantity as f64 * OPTION_MULTIPLIER - commission
}

/// Classify an `HH:MM` wall-clock time into a session bucket.
///
/// Minute-of-day ranges are closed and disjoint: 510-570 Cash Open,
/// 571-630 Euro Close, 870-900 Power Hour. Anything else, including
/// unparseable input, is Other.
pub fn classify_time_of_day(time: &str) -> TimeOfDay {
    let Some(minutes) = minute_of_day(time) else {
        return TimeOfDay::Other;
    };
    match minutes {
        510..=570 => TimeOfDay::CashOpen,
        571..=630 => TimeOfDay::EuroClose,
        870..=900 => TimeOfDay::PowerHour,
        _ => TimeOfDay::Other,
    }
}

fn minute_of_day(time: &str) -> Option<u32> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Planned risk/reward ratio. Zero risk is defined as ratio 0.
pub fn risk_reward_ratio(entry_price: f64, stop_loss: f64, take_profit: f64) -> f64 {
    let risk = (entry_price - stop_loss).abs();
    if risk == 0.0 {
        return 0.0;
    }
    (take_profit - entry_price).abs() / risk
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownStats {
    pub max_drawdown: f64,
    pub max_drawdown_percent: f64,
    pub current_drawdown: f64,
}

/// Peak-to-trough decline over a chronological balance sequence.
///
/// Max drawdown is the largest (peak - balance) observed, reported both
/// absolute and as a percentage of the peak it fell from; current
/// drawdown is the distance of the final balance below the overall high.
pub fn drawdown(balances: &[f64]) -> DrawdownStats {
    let Some(&first) = balances.first() else {
        return DrawdownStats::default();
    };

    let mut peak = first;
    let mut stats = DrawdownStats::default();

    for &balance in balances {
        if balance > peak {
            peak = balance;
        }
        let dd = peak - balance;
        if dd > stats.max_drawdown {
            stats.max_drawdown = dd;
            stats.max_drawdown_percent = if peak != 0.0 { dd / peak * 100.0 } else { 0.0 };
        }
    }

    // peak now holds the overall high of the whole sequence
    if let Some(&last) = balances.last() {
        stats.current_drawdown = peak - last;
    }
    stats
}

/// Sharpe ratio over per-period (daily) returns against an annual
/// risk-free rate, using population standard deviation. Returns 0 for
/// empty input or zero volatility.
pub fn sharpe_ratio(returns: &[f64], annual_risk_free: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        return 0.0;
    }
    (mean - annual_risk_free / TRADING_DAYS_PER_YEAR) / stddev
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
}

/// A maximal run of same-outcome trades. `start` indexes into the
/// closed-trade sequence the run was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub kind: StreakKind,
    pub length: usize,
    pub start: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakAnalysis {
    pub streaks: Vec<Streak>,
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
    /// Signed length of the final run: positive for wins, negative for losses.
    pub current_streak: i64,
}

/// Partition a chronological P&L sequence into win/loss runs.
/// A trade is a win when P&L > 0 and a loss otherwise.
pub fn streaks(pnls: &[f64]) -> StreakAnalysis {
    let mut analysis = StreakAnalysis::default();

    for (index, &pnl) in pnls.iter().enumerate() {
        let kind = if pnl > 0.0 {
            StreakKind::Win
        } else {
            StreakKind::Loss
        };

        match analysis.streaks.last_mut() {
            Some(run) if run.kind == kind => run.length += 1,
            _ => analysis.streaks.push(Streak {
                kind,
                length: 1,
                start: index,
            }),
        }
    }

    for run in &analysis.streaks {
        match run.kind {
            StreakKind::Win => analysis.max_win_streak = analysis.max_win_streak.max(run.length),
            StreakKind::Loss => analysis.max_loss_streak = analysis.max_loss_streak.max(run.length),
        }
    }

    if let Some(last) = analysis.streaks.last() {
        analysis.current_streak = match last.kind {
            StreakKind::Win => last.length as i64,
            StreakKind::Loss => -(last.length as i64),
        };
    }

    analysis
}

/// Streak analysis over a trade list in fetched (chronological) order.
/// Trades without a realized P&L are excluded first.
pub fn trade_streaks(trades: &[Trade]) -> StreakAnalysis {
    let pnls: Vec<f64> = trades.iter().filter_map(|t| t.pnl).collect();
    streaks(&pnls)
}
