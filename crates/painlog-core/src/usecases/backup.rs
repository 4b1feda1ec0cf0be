//! Backup use case
//!
//! Pushes the entire unfiltered local collection to the remote document as
//! one overwrite. Steps run strictly in sequence: token, export, provision,
//! overwrite, stamp. Any failure aborts the call; ids cached during
//! provisioning are deliberately kept, since they stay valid regardless of
//! how the upload ended.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::metadata::instant_to_value;
use crate::domain::{CoreError, MetadataKey};
use crate::ports::{RecordFilter, RecordStore, RemoteStore};
use crate::session::SessionManager;
use crate::usecases::export_records::ExportRecords;
use crate::usecases::provision::RemoteProvisioner;

pub struct Backup {
    store: Arc<dyn RecordStore>,
    remote: Arc<dyn RemoteStore>,
    session: Arc<SessionManager>,
    provisioner: RemoteProvisioner,
}

impl Backup {
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

    pub async fn execute(&self) -> Result<(), CoreError> {
        // 1. Token first: unconfigured or offline states fail before any
        //    local work happens.
        let token = self.session.ensure_token().await?;

        // 2. Serialize the full collection. The same body doubles as the
        //    initial content if provisioning has to create the document.
        let envelope = ExportRecords::new(self.store.clone())
            .execute(RecordFilter::new())
            .await?;
        let count = envelope.events.len();
        let body = envelope.to_json()?;

        // 3. Provision, then overwrite in full. Never a partial upload.
        let target = self.provisioner.ensure_target(&token, &body).await?;
        self.remote
            .overwrite_file(&token, &target.file_id, &body)
            .await?;

        // 4. Stamp only after the upload succeeded.
        let now = Utc::now();
        self.store
            .set_metadata(MetadataKey::LastBackupAt, &instant_to_value(now))
            .await?;

        info!(count, file = %target.file_id, "Backup completed");
        Ok(())
    }
}
