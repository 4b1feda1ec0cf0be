//! PainRecord domain entity
//!
//! The unit of user data: one pain episode with its timing, severity,
//! categorical descriptors and free-text notes. Categorical keys belong to
//! the taxonomy collaborator and are opaque to the core; they are stored and
//! round-tripped verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

// ============================================================================
// RecordId
// ============================================================================

/// Opaque unique identifier of a record, the merge key.
///
/// Generated as a UUIDv4 string at creation but treated as an opaque string
/// everywhere else, since imported batches may carry ids minted elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh random id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// FieldValue
// ============================================================================

/// A categorical field value: a vocabulary key plus an optional free-text
/// override.
///
/// `custom_text` is only meaningful when `key` is the taxonomy collaborator's
/// "other" sentinel; the core does not validate either against the
/// vocabulary and round-trips both verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    /// Vocabulary key (or the "other" sentinel), opaque to the core
    pub key: String,
    /// Free-text override accompanying the sentinel key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
}

impl FieldValue {
    /// Creates a plain vocabulary value
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            custom_text: None,
        }
    }

    /// Creates a value carrying a free-text override
    pub fn with_custom_text(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            custom_text: Some(text.into()),
        }
    }
}

// ============================================================================
// PainRecord
// ============================================================================

/// A single stored pain episode.
///
/// `created_at` and `updated_at` are stamped by the store; `updated_at` is
/// the sole authority for conflict resolution and is monotonically
/// non-decreasing per id across local mutations. On the wire all instants
/// are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainRecord {
    /// Opaque unique id, assigned at creation, immutable
    pub id: RecordId,
    /// When the episode started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_at: DateTime<Utc>,
    /// When the episode ended, if it has
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_at: Option<DateTime<Utc>>,
    /// Severity, 0-10
    pub pain: u8,
    /// Body region
    pub region: FieldValue,
    /// Joint within the region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint: Option<FieldValue>,
    /// Symptom quality
    pub symptom: FieldValue,
    /// Suspected trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<FieldValue>,
    /// Free-text notes
    #[serde(default)]
    pub notes: String,
    /// When the record was created (store-stamped)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated (store-stamped, merge authority)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// NewRecord and RecordPatch
// ============================================================================

/// Field values supplied when creating a record.
///
/// The store assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub pain: u8,
    pub region: FieldValue,
    pub joint: Option<FieldValue>,
    pub symptom: FieldValue,
    pub trigger: Option<FieldValue>,
    pub notes: String,
}

impl NewRecord {
    /// Materializes the values into a full record with the given id and stamp
    pub fn into_record(self, id: RecordId, now: DateTime<Utc>) -> PainRecord {
        PainRecord {
            id,
            start_at: self.start_at,
            end_at: self.end_at,
            pain: self.pain,
            region: self.region,
            joint: self.joint,
            symptom: self.symptom,
            trigger: self.trigger,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update over an existing record.
///
/// `None` fields are preserved verbatim on the stored record; there is no
/// implicit clearing. Clearing an optional field requires `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<Option<DateTime<Utc>>>,
    pub pain: Option<u8>,
    pub region: Option<FieldValue>,
    pub joint: Option<Option<FieldValue>>,
    pub symptom: Option<FieldValue>,
    pub trigger: Option<Option<FieldValue>>,
    pub notes: Option<String>,
}

impl RecordPatch {
    /// Shallow-merges the patch over `record`, stamping `updated_at = now`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply(self, record: &mut PainRecord, now: DateTime<Utc>) {
        if let Some(v) = self.start_at {
            record.start_at = v;
        }
        if let Some(v) = self.end_at {
            record.end_at = v;
        }
        if let Some(v) = self.pain {
            record.pain = v;
        }
        if let Some(v) = self.region {
            record.region = v;
        }
        if let Some(v) = self.joint {
            record.joint = v;
        }
        if let Some(v) = self.symptom {
            record.symptom = v;
        }
        if let Some(v) = self.trigger {
            record.trigger = v;
        }
        if let Some(v) = self.notes {
            record.notes = v;
        }
        record.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_new_record() -> NewRecord {
        NewRecord {
            start_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            end_at: None,
            pain: 5,
            region: FieldValue::new("knee"),
            joint: Some(FieldValue::new("patella")),
            symptom: FieldValue::new("stabbing"),
            trigger: None,
            notes: "after running".to_string(),
        }
    }

    #[test]
    fn test_into_record_stamps_both_timestamps() {
        let now = Utc::now();
        let record = sample_new_record().into_record(RecordId::generate(), now);
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, now);
        assert_eq!(record.pain, 5);
    }

    #[test]
    fn test_patch_preserves_unset_fields() {
        let now = Utc::now();
        let mut record = sample_new_record().into_record(RecordId::generate(), now);
        let later = now + chrono::Duration::seconds(10);

        let patch = RecordPatch {
            pain: Some(8),
            ..Default::default()
        };
        patch.apply(&mut record, later);

        assert_eq!(record.pain, 8);
        assert_eq!(record.region.key, "knee");
        assert_eq!(record.notes, "after running");
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn test_patch_can_clear_optional_field() {
        let now = Utc::now();
        let mut record = sample_new_record().into_record(RecordId::generate(), now);
        assert!(record.joint.is_some());

        let patch = RecordPatch {
            joint: Some(None),
            ..Default::default()
        };
        patch.apply(&mut record, now);
        assert!(record.joint.is_none());
    }

    #[test]
    fn test_serialization_uses_epoch_ms_and_camel_case() {
        let start = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let record = NewRecord {
            start_at: start,
            ..sample_new_record()
        }
        .into_record(RecordId::new("r1"), start);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "r1");
        assert_eq!(json["startAt"], 1_700_000_000_000i64);
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        assert_eq!(json["region"]["key"], "knee");
        // absent optionals are omitted, not null
        assert!(json.get("endAt").is_none());
        assert!(json.get("trigger").is_none());
    }

    #[test]
    fn test_field_value_custom_text_round_trip() {
        let value = FieldValue::with_custom_text("other", "fencing practice");
        let json = serde_json::to_string(&value).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert!(json.contains("customText"));
    }
}
