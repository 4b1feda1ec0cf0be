//! SQLite implementation of RecordStore
//!
//! This module provides the concrete SQLite-based implementation of the
//! record store port defined in painlog-core. It handles all domain type
//! serialization/deserialization and SQL query construction.
//!
//! ## Type Mapping
//!
//! | Domain Type   | SQL Type | Strategy                                  |
//! |---------------|----------|-------------------------------------------|
//! | RecordId      | TEXT     | String via `.as_str()` / `RecordId::new()`|
//! | FieldValue    | TEXT x2  | `<field>_key` + `<field>_text` columns    |
//! | DateTime<Utc> | INTEGER  | Unix epoch milliseconds                   |
//! | pain (u8)     | INTEGER  | checked narrowing on read                 |

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use painlog_core::domain::{
    CoreError, FieldValue, MetadataKey, NewRecord, PainRecord, RecordId, RecordPatch,
};
use painlog_core::ports::{RecordFilter, RecordStore, SortOrder};

/// SQLite-based implementation of the record store port
///
/// Provides persistent storage for pain records and sync metadata.
/// All operations are performed through a connection pool.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Creates a new store instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Helper functions for type conversion
// ============================================================================

/// All storage failures are fatal from the core's point of view
fn storage_err(e: sqlx::Error) -> CoreError {
    CoreError::Storage(format!("Query failed: {}", e))
}

/// Convert an epoch-millisecond column to a DateTime
fn datetime_from_ms(ms: i64) -> Result<DateTime<Utc>, CoreError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| CoreError::Storage(format!("Invalid stored timestamp: {}", ms)))
}

/// Current instant truncated to milliseconds, so stamped records read back
/// exactly as they were returned
fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

/// Reassemble an optional categorical value from its key/text column pair
fn field_value_from_columns(key: Option<String>, text: Option<String>) -> Option<FieldValue> {
    key.map(|key| FieldValue {
        key,
        custom_text: text,
    })
}

/// Reconstruct a PainRecord from a database row
fn record_from_row(row: &SqliteRow) -> Result<PainRecord, CoreError> {
    let id: String = row.get("id");
    let start_at: i64 = row.get("start_at");
    let end_at: Option<i64> = row.get("end_at");
    let pain: i64 = row.get("pain");
    let region_key: String = row.get("region_key");
    let region_text: Option<String> = row.get("region_text");
    let joint_key: Option<String> = row.get("joint_key");
    let joint_text: Option<String> = row.get("joint_text");
    let symptom_key: String = row.get("symptom_key");
    let symptom_text: Option<String> = row.get("symptom_text");
    let trigger_key: Option<String> = row.get("trigger_key");
    let trigger_text: Option<String> = row.get("trigger_text");
    let notes: String = row.get("notes");
    let created_at: i64 = row.get("created_at");
    let updated_at: i64 = row.get("updated_at");

    // Rows only ever arrive through the typed API, but a hand-edited
    // database must not wrap around into a bogus severity.
    let pain = u8::try_from(pain)
        .map_err(|_| CoreError::Storage(format!("Invalid stored pain value: {}", pain)))?;

    Ok(PainRecord {
        id: RecordId::new(id),
        start_at: datetime_from_ms(start_at)?,
        end_at: end_at.map(datetime_from_ms).transpose()?,
        pain,
        region: FieldValue {
            key: region_key,
            custom_text: region_text,
        },
        joint: field_value_from_columns(joint_key, joint_text),
        symptom: FieldValue {
            key: symptom_key,
            custom_text: symptom_text,
        },
        trigger: field_value_from_columns(trigger_key, trigger_text),
        notes,
        created_at: datetime_from_ms(created_at)?,
        updated_at: datetime_from_ms(updated_at)?,
    })
}

impl SqliteRecordStore {
    /// Insert or replace a record row verbatim
    async fn upsert(&self, record: &PainRecord) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO records \
             (id, start_at, end_at, pain, region_key, region_text, \
              joint_key, joint_text, symptom_key, symptom_text, \
              trigger_key, trigger_text, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.as_str())
        .bind(record.start_at.timestamp_millis())
        .bind(record.end_at.map(|dt| dt.timestamp_millis()))
        .bind(i64::from(record.pain))
        .bind(&record.region.key)
        .bind(&record.region.custom_text)
        .bind(record.joint.as_ref().map(|v| v.key.as_str()))
        .bind(record.joint.as_ref().and_then(|v| v.custom_text.as_deref()))
        .bind(&record.symptom.key)
        .bind(&record.symptom.custom_text)
        .bind(record.trigger.as_ref().map(|v| v.key.as_str()))
        .bind(record.trigger.as_ref().and_then(|v| v.custom_text.as_deref()))
        .bind(&record.notes)
        .bind(record.created_at.timestamp_millis())
        .bind(record.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

// ============================================================================
// RecordStore implementation
// ============================================================================

#[async_trait::async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, values: NewRecord) -> Result<PainRecord, CoreError> {
        let record = values.into_record(RecordId::generate(), now_ms());
        self.upsert(&record).await?;

        tracing::trace!(record_id = %record.id, "Created record");
        Ok(record)
    }

    async fn update(&self, id: &RecordId, patch: RecordPatch) -> Result<PainRecord, CoreError> {
        let mut record = self
            .get(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        patch.apply(&mut record, now_ms());
        self.upsert(&record).await?;

        tracing::trace!(record_id = %id, "Updated record");
        Ok(record)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        tracing::trace!(record_id = %id, "Deleted record");
        Ok(())
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        order: SortOrder,
    ) -> Result<Vec<PainRecord>, CoreError> {
        let mut sql = String::from("SELECT * FROM records WHERE 1=1");
        let cutoff = filter.cutoff(Utc::now());

        if filter.min_pain > 0 {
            sql.push_str(" AND pain >= ?");
        }
        if cutoff.is_some() {
            sql.push_str(" AND start_at >= ?");
        }
        if filter.region_key.is_some() {
            sql.push_str(" AND region_key = ?");
        }
        if filter.joint_key.is_some() {
            sql.push_str(" AND joint_key = ?");
        }
        sql.push_str(match order {
            SortOrder::NewestFirst => " ORDER BY start_at DESC",
            SortOrder::OldestFirst => " ORDER BY start_at ASC",
        });

        // Build the query dynamically
        let mut query = sqlx::query(&sql);
        if filter.min_pain > 0 {
            query = query.bind(i64::from(filter.min_pain));
        }
        if let Some(cutoff) = cutoff {
            query = query.bind(cutoff.timestamp_millis());
        }
        if let Some(ref key) = filter.region_key {
            query = query.bind(key);
        }
        if let Some(ref key) = filter.joint_key {
            query = query.bind(key);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(storage_err)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(record_from_row(row)?);
        }

        Ok(records)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<PainRecord>, CoreError> {
        let row = sqlx::query("SELECT * FROM records WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        match row {
            Some(ref r) => Ok(Some(record_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, record: &PainRecord) -> Result<(), CoreError> {
        self.upsert(record).await?;

        tracing::trace!(record_id = %record.id, "Put record verbatim");
        Ok(())
    }

    // --- Metadata operations ---

    async fn get_metadata(&self, key: MetadataKey) -> Result<Option<String>, CoreError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM sync_metadata WHERE key = ?")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_err)?;

        Ok(value)
    }

    async fn set_metadata(&self, key: MetadataKey, value: &str) -> Result<(), CoreError> {
        sqlx::query("INSERT OR REPLACE INTO sync_metadata (key, value) VALUES (?, ?)")
            .bind(key.as_str())
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        tracing::trace!(key = key.as_str(), "Set metadata");
        Ok(())
    }

    async fn clear_metadata(&self) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM sync_metadata")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        tracing::debug!("Cleared sync metadata");
        Ok(())
    }
}
