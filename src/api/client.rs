use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::models::{
    CreatePremarketInput, CreateTradeInput, PerformanceSummary, PremarketAnalysis, Trade,
};

/// Journal backend API consumed by the analytics layer.
///
/// The importer, cache and auto-save services all talk to the backend
/// through this trait so they can be exercised against a mock.
#[async_trait]
pub trait JournalApi: Send + Sync {
    /// `GET /api/trades`
    async fn fetch_trades(&self) -> Result<Vec<Trade>, ApiError>;

    /// `POST /api/trades`
    async fn create_trade(&self, input: &CreateTradeInput) -> Result<Trade, ApiError>;

    /// `GET /api/performance/analytics`
    async fn fetch_performance_summary(&self) -> Result<PerformanceSummary, ApiError>;

    /// `GET /api/settings/account_balance` — starting balance seeding the equity curve
    async fn fetch_account_balance(&self) -> Result<f64, ApiError>;

    /// `GET /api/premarket-analysis/today` — `None` when no note exists yet
    async fn fetch_today_premarket(&self) -> Result<Option<PremarketAnalysis>, ApiError>;

    /// `POST /api/premarket-analysis`
    async fn create_premarket(
        &self,
        input: &CreatePremarketInput,
    ) -> Result<PremarketAnalysis, ApiError>;

    /// `PATCH /api/premarket-analysis/{id}` with updated climate notes
    async fn update_premarket_notes(
        &self,
        id: &str,
        notes: &str,
    ) -> Result<PremarketAnalysis, ApiError>;
}

/// Settings values come back as `{"value": ...}` where the value may be
/// stored as a string or a number depending on the settings table row.
#[derive(Debug, Deserialize)]
struct SettingValue {
    value: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotesPatch<'a> {
    climate_notes: &'a str,
}

/// `reqwest`-backed client for the journal backend.
pub struct HttpJournalClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpJournalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    /// GET that maps a 404 to `None` instead of an error.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.http.patch(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl JournalApi for HttpJournalClient {
    async fn fetch_trades(&self) -> Result<Vec<Trade>, ApiError> {
        self.get("api/trades").await
    }

    async fn create_trade(&self, input: &CreateTradeInput) -> Result<Trade, ApiError> {
        self.post("api/trades", input).await
    }

    async fn fetch_performance_summary(&self) -> Result<PerformanceSummary, ApiError> {
        self.get("api/performance/analytics").await
    }

    async fn fetch_account_balance(&self) -> Result<f64, ApiError> {
        let setting: SettingValue = self.get("api/settings/account_balance").await?;
        match &setting.value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| ApiError::Parse(format!("non-finite account balance: {}", n))),
            serde_json::Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                ApiError::Parse(format!("account balance is not numeric: {:?}", s))
            }),
            other => Err(ApiError::Parse(format!(
                "unexpected account balance value: {}",
                other
            ))),
        }
    }

    async fn fetch_today_premarket(&self) -> Result<Option<PremarketAnalysis>, ApiError> {
        self.get_optional("api/premarket-analysis/today").await
    }

    async fn create_premarket(
        &self,
        input: &CreatePremarketInput,
    ) -> Result<PremarketAnalysis, ApiError> {
        self.post("api/premarket-analysis", input).await
    }

    async fn update_premarket_notes(
        &self,
        id: &str,
        notes: &str,
    ) -> Result<PremarketAnalysis, ApiError> {
        let path = format!("api/premarket-analysis/{}", id);
        self.patch(&path, &NotesPatch { climate_notes: notes }).await
    }
}
