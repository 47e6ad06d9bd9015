pub mod autosave;

pub use autosave::{NoteAutoSaver, NoteSink, DEFAULT_AUTOSAVE_DELAY};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;

use crate::api::{ApiError, JournalApi};
use crate::models::CreatePremarketInput;

/// [`NoteSink`] that persists climate notes through the journal backend:
/// PATCH when today's premarket record already exists, POST otherwise.
pub struct PremarketNoteSink {
    api: Arc<dyn JournalApi>,
}

impl PremarketNoteSink {
    pub fn new(api: Arc<dyn JournalApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl NoteSink for PremarketNoteSink {
    async fn persist(&self, text: String) -> Result<(), ApiError> {
        match self.api.fetch_today_premarket().await? {
            Some(existing) => {
                self.api.update_premarket_notes(&existing.id, &text).await?;
            }
            None => {
                // Local date, matching what the user sees as "today".
                self.api
                    .create_premarket(&CreatePremarketInput {
                        date: Local::now().date_naive(),
                        climate_notes: text,
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateTradeInput, PerformanceSummary, PremarketAnalysis, Trade};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    enum Call {
        Created(String),
        Patched { id: String, notes: String },
    }

    struct PremarketJournal {
        existing: Option<PremarketAnalysis>,
        calls: Mutex<Vec<Call>>,
    }

    #[async_trait]
    impl JournalApi for PremarketJournal {
        async fn fetch_trades(&self) -> Result<Vec<Trade>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_trade(&self, _input: &CreateTradeInput) -> Result<Trade, ApiError> {
            Err(ApiError::NotFound("not used".into()))
        }

        async fn fetch_performance_summary(&self) -> Result<PerformanceSummary, ApiError> {
            Err(ApiError::NotFound("not used".into()))
        }

        async fn fetch_account_balance(&self) -> Result<f64, ApiError> {
            Err(ApiError::NotFound("not used".into()))
        }

        async fn fetch_today_premarket(&self) -> Result<Option<PremarketAnalysis>, ApiError> {
            Ok(self.existing.clone())
        }

        async fn create_premarket(
            &self,
            input: &CreatePremarketInput,
        ) -> Result<PremarketAnalysis, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Created(input.climate_notes.clone()));
            Ok(PremarketAnalysis {
                id: "pm-new".into(),
                date: input.date,
                climate_notes: input.climate_notes.clone(),
                updated_at: None,
            })
        }

        async fn update_premarket_notes(
            &self,
            id: &str,
            notes: &str,
        ) -> Result<PremarketAnalysis, ApiError> {
            self.calls.lock().unwrap().push(Call::Patched {
                id: id.to_string(),
                notes: notes.to_string(),
            });
            Ok(PremarketAnalysis {
                id: id.to_string(),
                date: NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
                climate_notes: notes.to_string(),
                updated_at: None,
            })
        }
    }

    #[tokio::test]
    async fn patches_when_todays_note_exists() {
        let journal = Arc::new(PremarketJournal {
            existing: Some(PremarketAnalysis {
                id: "pm-7".into(),
                date: NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
                climate_notes: "old".into(),
                updated_at: None,
            }),
            calls: Mutex::new(Vec::new()),
        });

        let sink = PremarketNoteSink::new(journal.clone());
        sink.persist("futures red".into()).await.unwrap();

        let calls = journal.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Patched { id, notes } => {
                assert_eq!(id, "pm-7");
                assert_eq!(notes, "futures red");
            }
            Call::Created(_) => panic!("expected PATCH, got POST"),
        }
    }

    #[tokio::test]
    async fn creates_when_no_note_exists() {
        let journal = Arc::new(PremarketJournal {
            existing: None,
            calls: Mutex::new(Vec::new()),
        });

        let sink = PremarketNoteSink::new(journal.clone());
        sink.persist("quiet open".into()).await.unwrap();

        let calls = journal.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Created(notes) => assert_eq!(notes, "quiet open"),
            Call::Patched { .. } => panic!("expected POST, got PATCH"),
        }
    }
}
