//! Sync status projection consumed by the UI

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-only snapshot of remote sync state, derived from the session
/// manager plus the metadata table.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// An OAuth client id is configured
    pub configured: bool,
    /// A bearer token is currently held
    pub connected: bool,
    /// Cached remote folder id, if provisioned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Cached remote document id, if provisioned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Last successful backup instant
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_backup_at: Option<DateTime<Utc>>,
    /// Last successful restore instant
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_restore_at: Option<DateTime<Utc>>,
}
