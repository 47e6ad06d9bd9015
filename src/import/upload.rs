//! Sequential batch upload of parsed candidates. One POST is awaited at
//! a time so per-row outcomes keep the file order; a failed item is
//! tallied and the loop moves on — no retry, no rollback.

use serde::{Deserialize, Serialize};

use super::importer::ImportBatch;
use crate::api::JournalApi;

/// Snapshot passed to the progress callback after each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
}

/// Aggregate outcome of a batch upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl UploadReport {
    /// The batch counts as a success when at least one trade made it up.
    pub fn succeeded(&self) -> bool {
        self.uploaded > 0
    }
}

/// Upload every candidate in the batch, in order, reporting progress
/// after each item. Errors are per-item; the loop never aborts early.
pub async fn upload_candidates<A, F>(
    api: &A,
    batch: &ImportBatch,
    mut on_progress: F,
) -> UploadReport
where
    A: JournalApi + ?Sized,
    F: FnMut(UploadProgress),
{
    let total = batch.candidates.len();
    let mut report = UploadReport::default();

    for (index, candidate) in batch.candidates.iter().enumerate() {
        match api.create_trade(&candidate.to_create_input()).await {
            Ok(_) => report.uploaded += 1,
            Err(e) => {
                log::warn!("upload failed for {} ({}): {}", candidate.ticker, candidate.id, e);
                report.failed += 1;
                report
                    .errors
                    .push(format!("{} ({}): {}", candidate.ticker, candidate.id, e));
            }
        }

        on_progress(UploadProgress {
            completed: index + 1,
            total,
            failed: report.failed,
        });
    }

    report
}
