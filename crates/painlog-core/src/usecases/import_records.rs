//! Import use case (merge engine)
//!
//! Reconciles an incoming record batch against the store with a
//! last-writer-wins rule keyed by record id. The decision itself is a pure
//! function over the incoming record and the current local copy; the use
//! case applies it per record through the store port.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{CoreError, PainRecord, RecordDto};
use crate::ports::RecordStore;

/// Outcome of comparing one incoming record against the local copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// No local record with this id: insert the incoming one
    Insert,
    /// Incoming stamp is strictly newer: replace the local record
    Replace,
    /// Local record is as new or newer: leave it untouched
    Skip,
}

/// Pure last-writer-wins comparison.
///
/// The incoming side's authority is `updatedAt`, falling back to `createdAt`
/// and then the epoch; the local side's is always `updated_at`. Ties keep
/// the local record, which makes re-importing the same batch a no-op.
pub fn decide(incoming: &RecordDto, existing: Option<&PainRecord>) -> MergeDecision {
    match existing {
        None => MergeDecision::Insert,
        Some(local) if incoming.effective_stamp() > local.updated_at => MergeDecision::Replace,
        Some(_) => MergeDecision::Skip,
    }
}

/// Applies an incoming batch to the store, record by record
pub struct ImportRecords {
    store: Arc<dyn RecordStore>,
}

impl ImportRecords {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Runs the merge and returns the number of records inserted or
    /// replaced. A storage failure mid-batch aborts the loop; records
    /// applied before the failure stay applied, and a retry is safe because
    /// the rule is idempotent.
    pub async fn execute(&self, batch: Vec<RecordDto>) -> Result<u64, CoreError> {
        let now = Utc::now();
        let total = batch.len();
        let mut imported = 0u64;

        for dto in batch {
            let existing = self.store.get(&dto.id).await?;
            match decide(&dto, existing.as_ref()) {
                MergeDecision::Insert | MergeDecision::Replace => {
                    self.store.put(&dto.into_record(now)).await?;
                    imported += 1;
                }
                MergeDecision::Skip => {
                    debug!(id = %dto.id, "Skipping record, local copy is newer");
                }
            }
        }

        info!(imported, total, "Import batch applied");
        Ok(imported)
    }
}
