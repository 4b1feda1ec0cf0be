//! Record store port (driven/secondary port)
//!
//! Interface for the durable record collection plus its metadata table.
//!
//! ## Design Notes
//!
//! - Methods return `Result<_, CoreError>` rather than `anyhow::Result`
//!   because callers must be able to distinguish `NotFound` from fatal
//!   `Storage` failures at the use-case layer.
//! - `put` bypasses the store's timestamp stamping and exists only for the
//!   merge engine, which controls stamps itself.

use chrono::{DateTime, Utc};

use crate::domain::{
    CoreError, MetadataKey, NewRecord, PainRecord, RecordId, RecordPatch,
};

// ============================================================================
// RecordFilter and SortOrder
// ============================================================================

/// Filter criteria for listing records; all criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Minimum pain/severity threshold (inclusive); 0 matches everything
    pub min_pain: u8,
    /// Trailing window cutoff in days; 0 = no bound
    pub days: u32,
    /// Region key equality match
    pub region_key: Option<String>,
    /// Joint key equality match
    pub joint_key: Option<String>,
}

impl RecordFilter {
    /// Creates an empty filter (matches all records)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum pain threshold
    pub fn with_min_pain(mut self, min_pain: u8) -> Self {
        self.min_pain = min_pain;
        self
    }

    /// Sets the trailing window in days
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    /// Sets the region key equality match
    pub fn with_region_key(mut self, key: impl Into<String>) -> Self {
        self.region_key = Some(key.into());
        self
    }

    /// Sets the joint key equality match
    pub fn with_joint_key(mut self, key: impl Into<String>) -> Self {
        self.joint_key = Some(key.into());
        self
    }

    /// Resolves the trailing window into an absolute cutoff, if bounded
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.days == 0 {
            None
        } else {
            Some(now - chrono::Duration::days(i64::from(self.days)))
        }
    }
}

/// Sort order of `list` results by `start_at`.
///
/// Display queries want recent-first; export queries want chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `start_at` descending
    NewestFirst,
    /// `start_at` ascending
    OldestFirst,
}

// ============================================================================
// RecordStore trait
// ============================================================================

/// Port trait for the durable record collection and metadata table
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates a record: assigns a fresh id, stamps
    /// `created_at = updated_at = now`, persists, and returns the stored
    /// record. Fails only on storage-layer I/O errors.
    async fn create(&self, values: NewRecord) -> Result<PainRecord, CoreError>;

    /// Shallow-merges `patch` over the existing record, bumps `updated_at`,
    /// persists, and returns the result.
    ///
    /// Fails with `NotFound` if the id is absent; never creates a record.
    async fn update(&self, id: &RecordId, patch: RecordPatch) -> Result<PainRecord, CoreError>;

    /// Removes a record. Idempotent: a missing id is not an error.
    ///
    /// This is a hard delete with no tombstone; a restore performed after a
    /// local delete but before a backup will resurrect the record from the
    /// remote copy.
    async fn delete(&self, id: &RecordId) -> Result<(), CoreError>;

    /// Lists records matching `filter`, sorted by `start_at` per `order`.
    async fn list(&self, filter: &RecordFilter, order: SortOrder)
        -> Result<Vec<PainRecord>, CoreError>;

    /// Retrieves a record by id
    async fn get(&self, id: &RecordId) -> Result<Option<PainRecord>, CoreError>;

    /// Inserts or replaces a record verbatim, preserving its stamps.
    ///
    /// Merge-engine use only; does not bump `updated_at`.
    async fn put(&self, record: &PainRecord) -> Result<(), CoreError>;

    // --- Metadata operations ---

    /// Reads a metadata value; `None` means unset
    async fn get_metadata(&self, key: MetadataKey) -> Result<Option<String>, CoreError>;

    /// Writes a metadata value (insert or overwrite)
    async fn set_metadata(&self, key: MetadataKey, value: &str) -> Result<(), CoreError>;

    /// Explicit reset: removes every metadata entry
    async fn clear_metadata(&self) -> Result<(), CoreError>;
}
