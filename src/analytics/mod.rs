pub mod aggregator;
pub mod metrics;

pub use aggregator::{build_dashboard, DashboardAnalytics};
pub use metrics::{
    classify_time_of_day, drawdown, options_pnl, risk_reward_ratio, sharpe_ratio, streaks,
    trade_streaks, DrawdownStats, Streak, StreakAnalysis, StreakKind,
};
