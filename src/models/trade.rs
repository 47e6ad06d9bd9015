use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Option contract side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Calls,
    Puts,
}

/// Session bucket a trade's entry time falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[serde(rename = "Cash Open")]
    CashOpen,
    #[serde(rename = "Euro Close")]
    EuroClose,
    #[serde(rename = "Power Hour")]
    PowerHour,
    Other,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::CashOpen,
        TimeOfDay::EuroClose,
        TimeOfDay::PowerHour,
        TimeOfDay::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::CashOpen => "Cash Open",
            TimeOfDay::EuroClose => "Euro Close",
            TimeOfDay::PowerHour => "Power Hour",
            TimeOfDay::Other => "Other",
        }
    }
}

/// A journaled options trade as served by the backend.
///
/// `pnl` is populated only once the position is closed (exit price and
/// exit time set); the analytics layer never mutates a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub quantity: i32,
    pub strike_price: f64,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub entry_time: NaiveDateTime,
    pub exit_time: Option<NaiveDateTime>,
    pub expiration_date: NaiveDate,
    pub trade_date: NaiveDate,
    pub pnl: Option<f64>,
    #[serde(default)]
    pub entry_reason: String,
    #[serde(default)]
    pub exit_reason: String,
    #[serde(default)]
    pub playbook_id: Option<String>,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_time.is_some()
    }
}

/// Body for `POST /api/trades`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeInput {
    pub ticker: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub quantity: i32,
    pub strike_price: f64,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub entry_time: NaiveDateTime,
    pub exit_time: Option<NaiveDateTime>,
    pub expiration_date: NaiveDate,
    pub trade_date: NaiveDate,
    pub pnl: Option<f64>,
    pub entry_reason: String,
    pub exit_reason: String,
    pub playbook_id: Option<String>,
}
