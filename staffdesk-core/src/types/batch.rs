//! Bulk delete result types

use serde::{Deserialize, Serialize};
use staffdesk_transport::{RecordId, TransportError};

/// The delete that stopped a bulk run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteFailure {
    /// First failing record of the aborted batch
    pub record_id: RecordId,
    /// Index of the aborted batch (0-based)
    pub batch_index: usize,
    pub error: TransportError,
}

/// What a bulk delete actually did
///
/// Deletions completed before a failure are not rolled back; `deleted` lists exactly
/// the ids the backend confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteReport {
    /// Number of target ids
    pub requested: usize,
    /// Ids whose delete succeeded
    pub deleted: Vec<RecordId>,
    /// Batches started, including the failing one
    pub batches_attempted: usize,
    /// Batches the targets were split into
    pub batches_total: usize,
    /// Set when a batch failed and the remaining batches were skipped
    pub failure: Option<BatchDeleteFailure>,
}

impl BatchDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Aggregate message for a run that stopped part-way
    pub fn failure_message(&self) -> Option<String> {
        self.failure.as_ref().map(|failure| {
            format!(
                "Deleted {} of {} records; stopped at record {}: {}",
                self.deleted.len(),
                self.requested,
                failure.record_id,
                failure.error
            )
        })
    }
}
