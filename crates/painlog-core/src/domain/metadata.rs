//! Sync metadata keys
//!
//! The metadata table is a tiny key/value store holding remote resource
//! identifiers and last-sync instants. Keys are a fixed enumeration; at most
//! one value exists per key and absence means "unset".

use chrono::{DateTime, TimeZone, Utc};

/// Fixed enumeration of metadata keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    /// Id of the remote backup folder
    RemoteFolderId,
    /// Id of the remote backup document
    RemoteFileId,
    /// Instant of the last successful backup (epoch ms)
    LastBackupAt,
    /// Instant of the last successful restore (epoch ms)
    LastRestoreAt,
}

impl MetadataKey {
    /// Stable storage key string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKey::RemoteFolderId => "remote_folder_id",
            MetadataKey::RemoteFileId => "remote_file_id",
            MetadataKey::LastBackupAt => "last_backup_at",
            MetadataKey::LastRestoreAt => "last_restore_at",
        }
    }

    /// All keys, for explicit reset
    pub fn all() -> [MetadataKey; 4] {
        [
            MetadataKey::RemoteFolderId,
            MetadataKey::RemoteFileId,
            MetadataKey::LastBackupAt,
            MetadataKey::LastRestoreAt,
        ]
    }
}

/// Encodes an instant as the epoch-millisecond string stored under the
/// `Last*At` keys.
pub fn instant_to_value(instant: DateTime<Utc>) -> String {
    instant.timestamp_millis().to_string()
}

/// Decodes a stored epoch-millisecond string; malformed values read as unset.
pub fn instant_from_value(value: &str) -> Option<DateTime<Utc>> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}
