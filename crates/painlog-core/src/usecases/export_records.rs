//! Export use case
//!
//! Builds the versioned export envelope from the store: records matching the
//! filter in chronological order, with the filter echoed into the envelope's
//! `options` so a reader can tell a partial export from a full one.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{CoreError, ExportEnvelope, ExportOptions};
use crate::ports::{RecordFilter, RecordStore, SortOrder};

pub struct ExportRecords {
    store: Arc<dyn RecordStore>,
}

impl ExportRecords {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Lists records matching `filter` oldest-first and wraps them in an
    /// envelope stamped with the current instant.
    pub async fn execute(&self, filter: RecordFilter) -> Result<ExportEnvelope, CoreError> {
        let events = self.store.list(&filter, SortOrder::OldestFirst).await?;
        info!(count = events.len(), "Exporting records");

        let options = ExportOptions {
            min_pain: (filter.min_pain > 0).then_some(filter.min_pain),
            days: (filter.days > 0).then_some(filter.days),
            region_key: filter.region_key,
            joint_key: filter.joint_key,
        };
        Ok(ExportEnvelope::new(events, options, Utc::now()))
    }
}
