use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use super::client::JournalApi;
use super::error::ApiError;
use crate::models::{
    CreatePremarketInput, CreateTradeInput, PerformanceSummary, PremarketAnalysis, Trade,
};
use async_trait::async_trait;

/// Cache keys, one per backend endpoint.
pub mod keys {
    pub const TRADES: &str = "trades";
    pub const PERFORMANCE: &str = "performance/analytics";
    pub const ACCOUNT_BALANCE: &str = "settings/account_balance";
    pub const PREMARKET_TODAY: &str = "premarket-analysis/today";
}

/// Endpoint-keyed response cache.
///
/// Invalidation triggers are explicit: a trade mutation clears the trade
/// and performance entries, a premarket mutation clears the premarket
/// entries. Nothing expires by time; the dashboard refetches whenever an
/// entry is missing.
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        let value = entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("discarding cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => {
                self.entries.write().await.insert(key.to_string(), encoded);
            }
            Err(e) => log::warn!("not caching {}: {}", key, e),
        }
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub async fn invalidate_prefix(&self, prefix: &str) {
        self.entries
            .write()
            .await
            .retain(|key, _| !key.starts_with(prefix));
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// A [`JournalApi`] wrapper that serves repeated fetches from the cache
/// and applies the invalidation triggers on every mutation.
pub struct CachedJournal<A> {
    inner: A,
    cache: QueryCache,
}

impl<A: JournalApi> CachedJournal<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

#[async_trait]
impl<A: JournalApi> JournalApi for CachedJournal<A> {
    async fn fetch_trades(&self) -> Result<Vec<Trade>, ApiError> {
        if let Some(cached) = self.cache.get::<Vec<Trade>>(keys::TRADES).await {
            return Ok(cached);
        }
        let trades = self.inner.fetch_trades().await?;
        self.cache.put(keys::TRADES, &trades).await;
        Ok(trades)
    }

    async fn create_trade(&self, input: &CreateTradeInput) -> Result<Trade, ApiError> {
        let created = self.inner.create_trade(input).await?;
        // Trade mutation: derived analytics are stale too.
        self.cache.invalidate(keys::TRADES).await;
        self.cache.invalidate_prefix("performance").await;
        Ok(created)
    }

    async fn fetch_performance_summary(&self) -> Result<PerformanceSummary, ApiError> {
        if let Some(cached) = self.cache.get::<PerformanceSummary>(keys::PERFORMANCE).await {
            return Ok(cached);
        }
        let summary = self.inner.fetch_performance_summary().await?;
        self.cache.put(keys::PERFORMANCE, &summary).await;
        Ok(summary)
    }

    async fn fetch_account_balance(&self) -> Result<f64, ApiError> {
        if let Some(cached) = self.cache.get::<f64>(keys::ACCOUNT_BALANCE).await {
            return Ok(cached);
        }
        let balance = self.inner.fetch_account_balance().await?;
        self.cache.put(keys::ACCOUNT_BALANCE, &balance).await;
        Ok(balance)
    }

    async fn fetch_today_premarket(&self) -> Result<Option<PremarketAnalysis>, ApiError> {
        if let Some(cached) = self
            .cache
            .get::<Option<PremarketAnalysis>>(keys::PREMARKET_TODAY)
            .await
        {
            return Ok(cached);
        }
        let premarket = self.inner.fetch_today_premarket().await?;
        self.cache.put(keys::PREMARKET_TODAY, &premarket).await;
        Ok(premarket)
    }

    async fn create_premarket(
        &self,
        input: &CreatePremarketInput,
    ) -> Result<PremarketAnalysis, ApiError> {
        let created = self.inner.create_premarket(input).await?;
        self.cache.invalidate_prefix("premarket").await;
        Ok(created)
    }

    async fn update_premarket_notes(
        &self,
        id: &str,
        notes: &str,
    ) -> Result<PremarketAnalysis, ApiError> {
        let updated = self.inner.update_premarket_notes(id, notes).await?;
        self.cache.invalidate_prefix("premarket").await;
        Ok(updated)
    }
}
