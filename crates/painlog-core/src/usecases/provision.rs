//! Remote provisioning use case
//!
//! Idempotent "ensure" steps that materialize the remote backup location:
//! the folder, the document inside it, and the document's placement. Each
//! step follows the same ladder: trust the id cached in metadata, else
//! search the remote by name, else create. Resolved ids are cached back
//! into metadata so later calls skip the remote round trips.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{CoreError, MetadataKey};
use crate::ports::{AccessToken, RecordStore, RemoteId, RemoteStore, ResourceKind};

/// Fully provisioned remote location for backup/restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTarget {
    pub folder_id: RemoteId,
    pub file_id: RemoteId,
}

pub struct RemoteProvisioner {
    store: Arc<dyn RecordStore>,
    remote: Arc<dyn RemoteStore>,
    folder_name: String,
    file_name: String,
}

impl RemoteProvisioner {
    pub fn new(
        store: Arc<dyn RecordStore>,
        remote: Arc<dyn RemoteStore>,
        folder_name: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            remote,
            folder_name: folder_name.into(),
            file_name: file_name.into(),
        }
    }

    /// Runs all three ensure steps in order and returns the resolved ids.
    ///
    /// `initial_content` is uploaded only if the document has to be created,
    /// so a first backup never leaves an empty body on the remote.
    pub async fn ensure_target(
        &self,
        token: &AccessToken,
        initial_content: &str,
    ) -> Result<ProvisionedTarget, CoreError> {
        let folder_id = self.ensure_folder(token).await?;
        let file_id = self.ensure_file(token, &folder_id, initial_content).await?;
        self.ensure_file_location(token, &file_id, &folder_id).await?;
        Ok(ProvisionedTarget { folder_id, file_id })
    }

    /// Ensures the backup folder exists under the drive root
    pub async fn ensure_folder(&self, token: &AccessToken) -> Result<RemoteId, CoreError> {
        if let Some(cached) = self.store.get_metadata(MetadataKey::RemoteFolderId).await? {
            debug!(id = %cached, "Using cached remote folder id");
            return Ok(RemoteId::new(cached));
        }

        let id = match self
            .remote
            .find_child(token, &self.folder_name, None, ResourceKind::Folder)
            .await?
        {
            Some(id) => {
                info!(id = %id, "Found existing remote folder");
                id
            }
            None => {
                let id = self
                    .remote
                    .create_folder(token, &self.folder_name, None)
                    .await?;
                info!(id = %id, name = %self.folder_name, "Created remote folder");
                id
            }
        };

        self.store
            .set_metadata(MetadataKey::RemoteFolderId, id.as_str())
            .await?;
        Ok(id)
    }

    /// Ensures the backup document exists inside `folder_id`
    pub async fn ensure_file(
        &self,
        token: &AccessToken,
        folder_id: &RemoteId,
        initial_content: &str,
    ) -> Result<RemoteId, CoreError> {
        if let Some(cached) = self.store.get_metadata(MetadataKey::RemoteFileId).await? {
            debug!(id = %cached, "Using cached remote file id");
            return Ok(RemoteId::new(cached));
        }

        let id = match self
            .remote
            .find_child(token, &self.file_name, Some(folder_id), ResourceKind::File)
            .await?
        {
            Some(id) => {
                info!(id = %id, "Found existing remote file");
                id
            }
            None => {
                let id = self
                    .remote
                    .create_file(token, &self.file_name, folder_id, initial_content)
                    .await?;
                info!(id = %id, name = %self.file_name, "Created remote file");
                id
            }
        };

        self.store
            .set_metadata(MetadataKey::RemoteFileId, id.as_str())
            .await?;
        Ok(id)
    }

    /// Moves the document back into `folder_id` if it drifted.
    ///
    /// A manually moved document would otherwise make backups land outside
    /// the expected folder; re-parenting here keeps backup/restore
    /// self-healing against external reshuffling.
    pub async fn ensure_file_location(
        &self,
        token: &AccessToken,
        file_id: &RemoteId,
        folder_id: &RemoteId,
    ) -> Result<(), CoreError> {
        let parents = self.remote.get_parents(token, file_id).await?;
        if parents.contains(folder_id) {
            return Ok(());
        }

        warn!(file = %file_id, folder = %folder_id, "Remote file drifted, re-parenting");
        self.remote
            .set_parents(token, file_id, folder_id, &parents)
            .await?;
        Ok(())
    }
}
