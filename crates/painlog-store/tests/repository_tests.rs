//! Integration tests for SqliteRecordStore
//!
//! These tests verify all RecordStore methods using an in-memory SQLite
//! database. Each test function creates a fresh database to ensure test
//! isolation.

use chrono::{Duration, TimeZone, Utc};

use painlog_core::domain::{
    CoreError, FieldValue, MetadataKey, NewRecord, PainRecord, RecordId, RecordPatch,
};
use painlog_core::ports::{RecordFilter, RecordStore, SortOrder};
use painlog_store::{DatabasePool, SqliteRecordStore};

// ============================================================================
// Test helpers
// ============================================================================

/// Create a fresh in-memory store for each test
async fn setup() -> SqliteRecordStore {
    let pool = DatabasePool::in_memory()
        .await
        .expect("Failed to create in-memory database");
    SqliteRecordStore::new(pool.pool().clone())
}

fn new_record(start_ms: i64, pain: u8, region: &str) -> NewRecord {
    NewRecord {
        start_at: Utc.timestamp_millis_opt(start_ms).unwrap(),
        end_at: None,
        pain,
        region: FieldValue::new(region),
        joint: None,
        symptom: FieldValue::new("aching"),
        trigger: None,
        notes: String::new(),
    }
}

// ============================================================================
// CRUD tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_record() {
    let store = setup().await;

    let created = store
        .create(NewRecord {
            start_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            end_at: Some(Utc.timestamp_millis_opt(1_700_000_300_000).unwrap()),
            pain: 7,
            region: FieldValue::new("knee"),
            joint: Some(FieldValue::new("patella")),
            symptom: FieldValue::with_custom_text("other", "grinding"),
            trigger: Some(FieldValue::new("running")),
            notes: "after the evening run".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(created.created_at, created.updated_at);

    let retrieved = store.get(&created.id).await.unwrap();
    assert_eq!(retrieved, Some(created));
}

#[tokio::test]
async fn test_get_record_not_found() {
    let store = setup().await;

    let result = store.get(&RecordId::new("missing")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_patches_and_bumps_updated_at() {
    let store = setup().await;
    let created = store.create(new_record(1_700_000_000_000, 4, "hip")).await.unwrap();

    let updated = store
        .update(
            &created.id,
            RecordPatch {
                pain: Some(9),
                notes: Some("worse at night".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.pain, 9);
    assert_eq!(updated.notes, "worse at night");
    assert_eq!(updated.region.key, "hip");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let reread = store.get(&created.id).await.unwrap().unwrap();
    assert_eq!(reread, updated);
}

#[tokio::test]
async fn test_update_can_clear_optional_field() {
    let store = setup().await;
    let created = store
        .create(NewRecord {
            joint: Some(FieldValue::new("wrist")),
            ..new_record(1_700_000_000_000, 4, "arm")
        })
        .await
        .unwrap();

    let updated = store
        .update(
            &created.id,
            RecordPatch {
                joint: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.joint.is_none());
}

#[tokio::test]
async fn test_update_missing_record_fails_with_not_found() {
    let store = setup().await;

    let err = store
        .update(&RecordId::new("missing"), RecordPatch::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotFound(_)));
    // never creates as a side effect
    assert!(store.get(&RecordId::new("missing")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = setup().await;
    let created = store.create(new_record(1_700_000_000_000, 4, "knee")).await.unwrap();

    store.delete(&created.id).await.unwrap();
    assert!(store.get(&created.id).await.unwrap().is_none());

    // second delete of the same id is not an error
    store.delete(&created.id).await.unwrap();
}

#[tokio::test]
async fn test_out_of_range_pain_row_fails_as_storage_error() {
    let pool = DatabasePool::in_memory().await.unwrap();

    // a hand-edited row bypassing the typed API
    sqlx::query(
        "INSERT INTO records (id, start_at, pain, region_key, symptom_key, created_at, updated_at) \
         VALUES ('bad', 0, 300, 'knee', 'aching', 0, 0)",
    )
    .execute(pool.pool())
    .await
    .unwrap();

    let store = SqliteRecordStore::new(pool.pool().clone());
    let err = store.get(&RecordId::new("bad")).await.unwrap_err();

    assert!(matches!(err, CoreError::Storage(m) if m.contains("pain")));
}

// ============================================================================
// List / filter tests
// ============================================================================

#[tokio::test]
async fn test_list_sorts_by_start_at() {
    let store = setup().await;
    store.create(new_record(2000, 5, "knee")).await.unwrap();
    store.create(new_record(1000, 5, "knee")).await.unwrap();
    store.create(new_record(3000, 5, "knee")).await.unwrap();

    let newest = store
        .list(&RecordFilter::new(), SortOrder::NewestFirst)
        .await
        .unwrap();
    let starts: Vec<i64> = newest.iter().map(|r| r.start_at.timestamp_millis()).collect();
    assert_eq!(starts, vec![3000, 2000, 1000]);

    let oldest = store
        .list(&RecordFilter::new(), SortOrder::OldestFirst)
        .await
        .unwrap();
    let starts: Vec<i64> = oldest.iter().map(|r| r.start_at.timestamp_millis()).collect();
    assert_eq!(starts, vec![1000, 2000, 3000]);
}

#[tokio::test]
async fn test_list_applies_pain_and_region_filters() {
    let store = setup().await;
    store.create(new_record(1000, 8, "knee")).await.unwrap();
    store.create(new_record(2000, 3, "knee")).await.unwrap();
    store.create(new_record(3000, 9, "hip")).await.unwrap();

    let filter = RecordFilter::new().with_min_pain(6).with_region_key("knee");
    let results = store.list(&filter, SortOrder::NewestFirst).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].pain, 8);
    assert_eq!(results[0].region.key, "knee");
}

#[tokio::test]
async fn test_list_applies_trailing_window() {
    let store = setup().await;
    let now = Utc::now();
    store
        .create(NewRecord {
            start_at: now - Duration::days(2),
            ..new_record(0, 5, "knee")
        })
        .await
        .unwrap();
    store
        .create(NewRecord {
            start_at: now - Duration::days(40),
            ..new_record(0, 5, "knee")
        })
        .await
        .unwrap();

    let filter = RecordFilter::new().with_days(30);
    let results = store.list(&filter, SortOrder::NewestFirst).await.unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].start_at > now - Duration::days(30));
}

#[tokio::test]
async fn test_list_applies_joint_filter() {
    let store = setup().await;
    store
        .create(NewRecord {
            joint: Some(FieldValue::new("patella")),
            ..new_record(1000, 5, "knee")
        })
        .await
        .unwrap();
    store.create(new_record(2000, 5, "knee")).await.unwrap();

    let filter = RecordFilter::new().with_joint_key("patella");
    let results = store.list(&filter, SortOrder::NewestFirst).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].joint.as_ref().unwrap().key, "patella");
}

// ============================================================================
// Put (merge-engine upsert) tests
// ============================================================================

#[tokio::test]
async fn test_put_preserves_stamps_verbatim() {
    let store = setup().await;
    let stamp = Utc.timestamp_millis_opt(1_600_000_000_000).unwrap();
    let record = PainRecord {
        id: RecordId::new("imported-1"),
        start_at: stamp,
        end_at: None,
        pain: 6,
        region: FieldValue::new("shoulder"),
        joint: None,
        symptom: FieldValue::new("burning"),
        trigger: None,
        notes: String::new(),
        created_at: stamp,
        updated_at: stamp,
    };

    store.put(&record).await.unwrap();

    let reread = store.get(&record.id).await.unwrap().unwrap();
    assert_eq!(reread.created_at, stamp);
    assert_eq!(reread.updated_at, stamp);
}

#[tokio::test]
async fn test_put_replaces_existing_row() {
    let store = setup().await;
    let created = store.create(new_record(1000, 4, "knee")).await.unwrap();

    let replacement = PainRecord {
        pain: 10,
        notes: "replaced".to_string(),
        ..created.clone()
    };
    store.put(&replacement).await.unwrap();

    let reread = store.get(&created.id).await.unwrap().unwrap();
    assert_eq!(reread.pain, 10);
    assert_eq!(reread.notes, "replaced");
}

// ============================================================================
// Metadata tests
// ============================================================================

#[tokio::test]
async fn test_metadata_set_get_overwrite() {
    let store = setup().await;

    assert!(store
        .get_metadata(MetadataKey::RemoteFolderId)
        .await
        .unwrap()
        .is_none());

    store
        .set_metadata(MetadataKey::RemoteFolderId, "folder-1")
        .await
        .unwrap();
    store
        .set_metadata(MetadataKey::RemoteFolderId, "folder-2")
        .await
        .unwrap();

    assert_eq!(
        store
            .get_metadata(MetadataKey::RemoteFolderId)
            .await
            .unwrap()
            .as_deref(),
        Some("folder-2")
    );
}

#[tokio::test]
async fn test_clear_metadata_removes_every_key() {
    let store = setup().await;
    for key in MetadataKey::all() {
        store.set_metadata(key, "x").await.unwrap();
    }

    store.clear_metadata().await.unwrap();

    for key in MetadataKey::all() {
        assert!(store.get_metadata(key).await.unwrap().is_none());
    }
}

// ============================================================================
// File-backed pool tests
// ============================================================================

#[tokio::test]
async fn test_records_survive_pool_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("painlog.db");

    let id = {
        let pool = DatabasePool::new(&db_path).await.unwrap();
        let store = SqliteRecordStore::new(pool.pool().clone());
        store.create(new_record(1000, 5, "knee")).await.unwrap().id
    };

    let pool = DatabasePool::new(&db_path).await.unwrap();
    let store = SqliteRecordStore::new(pool.pool().clone());
    assert!(store.get(&id).await.unwrap().is_some());
}
