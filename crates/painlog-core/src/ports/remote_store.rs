//! Remote store port (driven/secondary port)
//!
//! Interface for the remote side of backup/restore: a single folder and a
//! single JSON document in the user's cloud drive. The primary adapter
//! targets Google Drive v3, but the trait only exposes the seven
//! capabilities the core consumes (list-by-name, create, parents read/write,
//! content read/overwrite).
//!
//! ## Design Notes
//!
//! - Every method takes the bearer token explicitly; the adapter holds no
//!   credential state, which keeps the session lifecycle in one place.
//! - Adapters classify failures before they cross this boundary:
//!   `Offline`, `ApiDisabled`, `RemoteRequestFailed`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::domain::CoreError;

// ============================================================================
// Identifiers and tokens
// ============================================================================

/// Provider-assigned identifier of a remote resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-lifetime bearer token for the remote API.
///
/// Never persisted to durable storage; the Debug form redacts the secret.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Kind of remote resource, used by name searches and creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Folder,
    File,
}

// ============================================================================
// RemoteStore trait
// ============================================================================

/// Port trait for the remote folder + document the dataset syncs against
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Finds a non-trashed child of `parent` with the given name and kind.
    ///
    /// `parent = None` searches under the drive root. When several children
    /// match, the first result wins; ambiguity is not specially handled.
    async fn find_child(
        &self,
        token: &AccessToken,
        name: &str,
        parent: Option<&RemoteId>,
        kind: ResourceKind,
    ) -> Result<Option<RemoteId>, CoreError>;

    /// Creates a folder under `parent` (or the root) and returns its id
    async fn create_folder(
        &self,
        token: &AccessToken,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteId, CoreError>;

    /// Creates a document inside `parent` with the given initial content
    async fn create_file(
        &self,
        token: &AccessToken,
        name: &str,
        parent: &RemoteId,
        content: &str,
    ) -> Result<RemoteId, CoreError>;

    /// Reads the resource's current parent set
    async fn get_parents(
        &self,
        token: &AccessToken,
        id: &RemoteId,
    ) -> Result<Vec<RemoteId>, CoreError>;

    /// Re-parents the resource: adds `add` and removes every id in `remove`
    async fn set_parents(
        &self,
        token: &AccessToken,
        id: &RemoteId,
        add: &RemoteId,
        remove: &[RemoteId],
    ) -> Result<(), CoreError>;

    /// Reads the document's content
    async fn read_file(&self, token: &AccessToken, id: &RemoteId) -> Result<String, CoreError>;

    /// Overwrites the document's content in full
    async fn overwrite_file(
        &self,
        token: &AccessToken,
        id: &RemoteId,
        content: &str,
    ) -> Result<(), CoreError>;
}
