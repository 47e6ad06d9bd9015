//! Dashboard view-model builder. Combines the fetched trade list and the
//! starting account balance into the derived datasets the widgets render.
//! Holds no state: the whole view is recomputed from scratch on every
//! call, and identical input produces identical output.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::metrics::{self, DrawdownStats, StreakAnalysis};
use crate::models::{DailyPnl, TimeOfDay, Trade};

/// Risk fallback when a trade carries no explicit stop: 10% of notional.
const ASSUMED_RISK_FRACTION: f64 = 0.1;

/// Width of one P&L histogram bin.
const HISTOGRAM_BIN_WIDTH: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub running_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Inclusive lower bound of the bin, a multiple of the bin width.
    pub lower: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub ticker: String,
    pub risk: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolBreakdown {
    pub ticker: String,
    pub pnl: f64,
    pub trades: usize,
    pub wins: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBreakdown {
    pub period: TimeOfDay,
    pub pnl: f64,
    pub trades: usize,
    pub wins: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_trades: usize,
    pub closed_trades: usize,
    pub total_pnl: f64,
    pub win_rate: f64,
}

/// Everything the dashboard widgets consume, derived and serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub summary: DashboardSummary,
    pub equity_curve: Vec<EquityPoint>,
    /// Calendar-heatmap dataset, one cell per trading day, in date order.
    pub daily_pnl: Vec<DailyPnl>,
    pub histogram: Vec<HistogramBin>,
    pub risk_reward: Vec<ScatterPoint>,
    pub symbol_breakdown: Vec<SymbolBreakdown>,
    pub time_breakdown: Vec<TimeBreakdown>,
    pub drawdown: DrawdownStats,
    pub sharpe: f64,
    pub streaks: StreakAnalysis,
}

/// Build the dashboard view-model from the fetched trade list.
///
/// Trades are folded in their fetched order; only completed trades
/// (non-null exit time) contribute to the equity curve and the derived
/// statistics. Daily buckets key on the trade date, already a date-only
/// value, so no timezone conversion can shift a trade across days.
pub fn build_dashboard(trades: &[Trade], starting_balance: f64) -> DashboardAnalytics {
    let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();

    let mut equity_curve = Vec::with_capacity(closed.len());
    let mut balance = starting_balance;
    for trade in &closed {
        if let Some(exit_time) = trade.exit_time {
            balance += trade.pnl.unwrap_or(0.0);
            equity_curve.push(EquityPoint {
                timestamp: exit_time,
                running_balance: balance,
            });
        }
    }

    let mut daily: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
    let mut symbols: BTreeMap<String, (f64, usize, usize)> = BTreeMap::new();
    let mut periods: BTreeMap<&'static str, (f64, usize, usize)> = BTreeMap::new();
    let mut risk_reward = Vec::with_capacity(closed.len());

    let mut total_pnl = 0.0;
    let mut wins = 0;

    for trade in &closed {
        let pnl = trade.pnl.unwrap_or(0.0);
        total_pnl += pnl;
        let won = pnl > 0.0;
        if won {
            wins += 1;
        }

        let day = daily.entry(trade.trade_date).or_insert((0.0, 0));
        day.0 += pnl;
        day.1 += 1;

        let bin = (pnl / HISTOGRAM_BIN_WIDTH).floor() as i64 * HISTOGRAM_BIN_WIDTH as i64;
        *histogram.entry(bin).or_insert(0) += 1;

        let symbol = symbols.entry(trade.ticker.clone()).or_insert((0.0, 0, 0));
        symbol.0 += pnl;
        symbol.1 += 1;
        if won {
            symbol.2 += 1;
        }

        let period = trade
            .time_of_day
            .unwrap_or_else(|| classify_entry(trade.entry_time));
        let bucket = periods.entry(period.as_str()).or_insert((0.0, 0, 0));
        bucket.0 += pnl;
        bucket.1 += 1;
        if won {
            bucket.2 += 1;
        }

        risk_reward.push(ScatterPoint {
            ticker: trade.ticker.clone(),
            risk: trade.entry_price
                * trade.quantity as f64
                * metrics::OPTION_MULTIPLIER
                * ASSUMED_RISK_FRACTION,
            reward: pnl,
        });
    }

    let daily_pnl: Vec<DailyPnl> = daily
        .iter()
        .map(|(&date, &(pnl, trade_count))| DailyPnl {
            date,
            pnl,
            trade_count,
        })
        .collect();

    // Balance path seeded at the starting balance, then one point per trade.
    let mut balances = Vec::with_capacity(equity_curve.len() + 1);
    balances.push(starting_balance);
    balances.extend(equity_curve.iter().map(|p| p.running_balance));
    let drawdown = metrics::drawdown(&balances);

    let sharpe = metrics::sharpe_ratio(
        &daily_returns(&daily_pnl, starting_balance),
        metrics::DEFAULT_RISK_FREE_RATE,
    );

    let win_rate = if closed.is_empty() {
        0.0
    } else {
        wins as f64 / closed.len() as f64 * 100.0
    };

    DashboardAnalytics {
        summary: DashboardSummary {
            total_trades: trades.len(),
            closed_trades: closed.len(),
            total_pnl,
            win_rate,
        },
        equity_curve,
        daily_pnl,
        histogram: histogram
            .into_iter()
            .map(|(lower, count)| HistogramBin { lower, count })
            .collect(),
        risk_reward,
        symbol_breakdown: symbols
            .into_iter()
            .map(|(ticker, (pnl, trades, wins))| SymbolBreakdown {
                ticker,
                pnl,
                trades,
                wins,
            })
            .collect(),
        time_breakdown: TimeOfDay::ALL
            .iter()
            .filter_map(|period| {
                periods
                    .get(period.as_str())
                    .map(|&(pnl, trades, wins)| TimeBreakdown {
                        period: *period,
                        pnl,
                        trades,
                        wins,
                    })
            })
            .collect(),
        drawdown,
        sharpe,
        streaks: metrics::trade_streaks(trades),
    }
}

fn classify_entry(entry_time: NaiveDateTime) -> TimeOfDay {
    metrics::classify_time_of_day(&entry_time.format("%H:%M").to_string())
}

/// Per-day returns against the running balance, in date order.
fn daily_returns(daily_pnl: &[DailyPnl], starting_balance: f64) -> Vec<f64> {
    let mut returns = Vec::with_capacity(daily_pnl.len());
    let mut balance = starting_balance;
    for day in daily_pnl {
        if balance.abs() > f64::EPSILON {
            returns.push(day.pnl / balance);
        }
        balance += day.pnl;
    }
    returns
}
