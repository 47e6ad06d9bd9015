use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate P&L for one calendar day, as returned by the backend and as
/// recomputed client-side. Derived on every fetch, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub pnl: f64,
    pub trade_count: usize,
}

/// Per-symbol slice of the server analytics summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolPerformance {
    pub symbol: String,
    pub pnl: f64,
    pub trades: usize,
    pub wins: usize,
}

/// Per-session slice of the server analytics summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePerformance {
    pub period: String,
    pub pnl: f64,
    pub trades: usize,
    pub wins: usize,
}

/// Server-aggregated summary from `GET /api/performance/analytics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    #[serde(rename = "winRate")]
    pub win_rate: f64,
    #[serde(rename = "avgRR")]
    pub avg_rr: f64,
    #[serde(rename = "totalTrades")]
    pub total_trades: usize,
    #[serde(rename = "symbolPerformance", default)]
    pub symbol_performance: Vec<SymbolPerformance>,
    #[serde(rename = "timePerformance", default)]
    pub time_performance: Vec<TimePerformance>,
    #[serde(rename = "dailyPnL", default)]
    pub daily_pnl: Vec<DailyPnl>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_deserializes_backend_json() {
        let json = r#"{
            "totalPnL": 1250.5,
            "winRate": 62.5,
            "avgRR": 1.8,
            "totalTrades": 16,
            "symbolPerformance": [
                {"symbol": "SPY", "pnl": 900.0, "trades": 10, "wins": 7}
            ],
            "timePerformance": [
                {"period": "Cash Open", "pnl": 400.0, "trades": 5, "wins": 4}
            ],
            "dailyPnL": [
                {"date": "2025-07-03", "pnl": 100.0, "tradeCount": 2}
            ]
        }"#;

        let summary: PerformanceSummary = serde_json::from_str(json).expect("valid summary");
        assert_eq!(summary.total_trades, 16);
        assert_eq!(summary.symbol_performance[0].symbol, "SPY");
        assert_eq!(summary.daily_pnl[0].trade_count, 2);
    }
}
