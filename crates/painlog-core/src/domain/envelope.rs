//! Export/import envelope
//!
//! The versioned wire container for the whole dataset:
//! `{schemaVersion, exportedAt, options, events}`. The export side
//! serializes full [`PainRecord`]s; the import side deserializes into
//! [`RecordDto`], which tolerates absent `createdAt`/`updatedAt` so the
//! merge engine can apply its fallback chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CoreError;
use super::record::{FieldValue, PainRecord, RecordId};

/// The only schema version this build reads and writes
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// ExportOptions
// ============================================================================

/// Echo of the filter/timeframe used to produce an export.
///
/// A full backup uses the default (unfiltered) options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Minimum pain threshold applied, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pain: Option<u8>,
    /// Trailing window in days (0/absent = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Region key equality filter applied, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_key: Option<String>,
    /// Joint key equality filter applied, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_key: Option<String>,
}

// ============================================================================
// Export side
// ============================================================================

/// Outgoing envelope written on backup/export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub schema_version: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub exported_at: DateTime<Utc>,
    pub options: ExportOptions,
    pub events: Vec<PainRecord>,
}

impl ExportEnvelope {
    /// Builds an envelope for the given batch, stamped `exported_at = now`
    pub fn new(events: Vec<PainRecord>, options: ExportOptions, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            exported_at: now,
            options,
            events,
        }
    }

    /// Serializes the envelope to its JSON document form
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self)
            .map_err(|e| CoreError::Storage(format!("Failed to serialize export envelope: {e}")))
    }
}

// ============================================================================
// Import side
// ============================================================================

/// An incoming record as found in a parsed envelope.
///
/// Stamps may be absent in documents produced by older or foreign writers;
/// the merge engine resolves them via `updatedAt` -> `createdAt` -> epoch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    pub id: RecordId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_at: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub end_at: Option<DateTime<Utc>>,
    pub pain: u8,
    pub region: FieldValue,
    #[serde(default)]
    pub joint: Option<FieldValue>,
    pub symptom: FieldValue,
    #[serde(default)]
    pub trigger: Option<FieldValue>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecordDto {
    /// The instant this incoming record claims authority for, used by the
    /// last-writer-wins comparison: `updatedAt`, else `createdAt`, else the
    /// Unix epoch.
    pub fn effective_stamp(&self) -> DateTime<Utc> {
        self.updated_at
            .or(self.created_at)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Materializes the incoming record into a stored one.
    ///
    /// `updated_at` is the incoming stamp, or `now` when the document
    /// carried none; `created_at` falls back the same way.
    pub fn into_record(self, now: DateTime<Utc>) -> PainRecord {
        let created_at = self.created_at.unwrap_or(now);
        let updated_at = self.updated_at.or(self.created_at).unwrap_or(now);
        PainRecord {
            id: self.id,
            start_at: self.start_at,
            end_at: self.end_at,
            pain: self.pain,
            region: self.region,
            joint: self.joint,
            symptom: self.symptom,
            trigger: self.trigger,
            notes: self.notes,
            created_at,
            updated_at,
        }
    }
}

/// Incoming envelope parsed on restore/import
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEnvelope {
    pub schema_version: u32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub options: ExportOptions,
    pub events: Vec<RecordDto>,
}

impl ImportEnvelope {
    /// Parses and validates an envelope document.
    ///
    /// Fails fast with `InvalidFormat` on malformed JSON, a missing `events`
    /// array, any malformed record, or an unknown `schemaVersion` — no
    /// partial validation is attempted.
    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let envelope: ImportEnvelope = serde_json::from_str(content)
            .map_err(|e| CoreError::InvalidFormat(e.to_string()))?;
        if envelope.schema_version != SCHEMA_VERSION {
            return Err(CoreError::InvalidFormat(format!(
                "unsupported schema version {}",
                envelope.schema_version
            )));
        }
        Ok(envelope)
    }
}
