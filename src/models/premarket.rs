use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Premarket market-condition note for a single session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremarketAnalysis {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub climate_notes: String,
    pub updated_at: Option<NaiveDateTime>,
}

/// Body for `POST /api/premarket-analysis`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePremarketInput {
    pub date: NaiveDate,
    pub climate_notes: String,
}
