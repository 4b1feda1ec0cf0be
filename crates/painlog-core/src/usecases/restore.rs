//! Restore use case
//!
//! Pulls the remote document and merges it into the local store. The merge
//! is last-writer-wins per record, so restoring never clobbers local edits
//! that are newer than the backup. A parse failure aborts before any store
//! mutation.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::metadata::instant_to_value;
use crate::domain::{CoreError, ImportEnvelope, MetadataKey};
use crate::ports::{RecordFilter, RecordStore, RemoteStore};
use crate::session::SessionManager;
use crate::usecases::export_records::ExportRecords;
use crate::usecases::import_records::ImportRecords;
use crate::usecases::provision::RemoteProvisioner;

/// Result of a restore: how many records were inserted or replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub imported: u64,
}

pub struct Restore {
    store: Arc<dyn RecordStore>,
    remote: Arc<dyn RemoteStore>,
    session: Arc<SessionManager>,
    provisioner: RemoteProvisioner,
}

impl Restore {
    pub fn new(
        store: Arc<dyn RecordStore>,
        remote: Arc<dyn RemoteStore>,
        session: Arc<SessionManager>,
        provisioner: RemoteProvisioner,
    ) -> Self {
        Self {
            store,
            remote,
            session,
            provisioner,
        }
    }

    pub async fn execute(&self) -> Result<RestoreOutcome, CoreError> {
        let token = self.session.ensure_token().await?;

        // Provisioning may have to create the document; seed it with the
        // current local export so a restore against a fresh drive reads
        // back our own data instead of an empty body.
        let current = ExportRecords::new(self.store.clone())
            .execute(RecordFilter::new())
            .await?
            .to_json()?;
        let target = self.provisioner.ensure_target(&token, &current).await?;

        let body = self.remote.read_file(&token, &target.file_id).await?;
        let envelope = ImportEnvelope::parse(&body)?;

        let imported = ImportRecords::new(self.store.clone())
            .execute(envelope.events)
            .await?;

        let stamp = instant_to_value(Utc::now());
        self.store
            .set_metadata(MetadataKey::LastBackupAt, &stamp)
            .await?;
        self.store
            .set_metadata(MetadataKey::LastRestoreAt, &stamp)
            .await?;

        info!(imported, file = %target.file_id, "Restore completed");
        Ok(RestoreOutcome { imported })
    }
}
