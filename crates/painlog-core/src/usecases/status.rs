//! Status projection use case
//!
//! Derives the read-only sync status shown to the user from session state
//! plus the metadata table. Purely observational: no remote calls.

use std::sync::Arc;

use crate::domain::metadata::instant_from_value;
use crate::domain::{CoreError, MetadataKey, SyncStatus};
use crate::ports::RecordStore;
use crate::session::{SessionManager, SessionPhase};

pub struct FetchStatus {
    store: Arc<dyn RecordStore>,
    session: Arc<SessionManager>,
}

impl FetchStatus {
    pub fn new(store: Arc<dyn RecordStore>, session: Arc<SessionManager>) -> Self {
        Self { store, session }
    }

    pub async fn execute(&self) -> Result<SyncStatus, CoreError> {
        let last_backup = self.store.get_metadata(MetadataKey::LastBackupAt).await?;
        let last_restore = self.store.get_metadata(MetadataKey::LastRestoreAt).await?;

        Ok(SyncStatus {
            configured: self.session.is_configured(),
            connected: self.session.phase().await == SessionPhase::Held,
            folder_id: self.store.get_metadata(MetadataKey::RemoteFolderId).await?,
            file_id: self.store.get_metadata(MetadataKey::RemoteFileId).await?,
            last_backup_at: last_backup.as_deref().and_then(instant_from_value),
            last_restore_at: last_restore.as_deref().and_then(instant_from_value),
        })
    }
}
