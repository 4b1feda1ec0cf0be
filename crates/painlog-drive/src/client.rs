//! Google Drive v3 API client
//!
//! Implements the `RemoteStore` port over the small slice of the Drive v3
//! API the core consumes: name/parent search, resource creation, parent
//! reads and updates, and document content read/overwrite.
//!
//! Every call checks network reachability first and classifies non-success
//! responses before they cross the port boundary: the "API not enabled"
//! signature maps to `ApiDisabled`, everything else to
//! `RemoteRequestFailed` carrying the provider's message.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use painlog_core::domain::CoreError;
use painlog_core::ports::{AccessToken, Connectivity, RemoteId, RemoteStore, ResourceKind};

/// Base URL for Google Drive API v3
const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Base URL for Drive v3 media uploads
const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// MIME type marking a Drive folder
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Part boundary for multipart/related file creation
const MULTIPART_BOUNDARY: &str = "painlog_boundary";

// ============================================================================
// Drive API response types
// ============================================================================

/// Response from a files search
#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

/// A single file entry in search or creation responses
#[derive(Debug, Deserialize)]
struct FileRef {
    id: String,
}

/// Response from a parents metadata read
#[derive(Debug, Deserialize)]
struct FileParents {
    #[serde(default)]
    parents: Vec<String>,
}

/// Standard Google API error envelope
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    reason: Option<String>,
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Google Drive v3 calls
///
/// Wraps `reqwest::Client` with bearer authentication, base URL
/// construction, and error classification. The token is passed per call;
/// the client itself holds no credential state.
pub struct DriveClient {
    client: Client,
    base_url: String,
    upload_base_url: String,
    connectivity: Arc<dyn Connectivity>,
}

impl DriveClient {
    /// Creates a new DriveClient against the production endpoints
    pub fn new(connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            client: Client::new(),
            base_url: DRIVE_BASE_URL.to_string(),
            upload_base_url: UPLOAD_BASE_URL.to_string(),
            connectivity,
        }
    }

    /// Creates a new DriveClient with custom base URLs (useful for testing)
    pub fn with_base_url(
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            upload_base_url: upload_base_url.into(),
            connectivity,
        }
    }

    /// Fails fast with `Offline` when the network is unreachable
    async fn ensure_online(&self) -> Result<(), CoreError> {
        if self.connectivity.is_online().await {
            Ok(())
        } else {
            Err(CoreError::Offline)
        }
    }

    /// Creates an authenticated request builder for the given method and path
    fn request(&self, method: Method, path: &str, token: &AccessToken) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(token.secret())
    }

    /// Same as [`request`](Self::request) against the upload endpoint
    fn upload_request(&self, method: Method, path: &str, token: &AccessToken) -> RequestBuilder {
        let url = format!("{}{}", self.upload_base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(token.secret())
    }

    /// Sends a request and classifies any non-success response
    async fn send(&self, builder: RequestBuilder) -> Result<Response, CoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| CoreError::RemoteRequestFailed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

/// Assembles a multipart/related body: metadata part, then content part
fn multipart_related_body(metadata: &serde_json::Value, content: &str) -> String {
    format!(
        "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{m}\r\n\
         --{b}\r\nContent-Type: application/json\r\n\r\n{c}\r\n--{b}--",
        b = MULTIPART_BOUNDARY,
        m = metadata,
        c = content
    )
}

/// Builds the `q` search expression for a child lookup
fn child_query(name: &str, parent: Option<&RemoteId>, kind: ResourceKind) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    let parent_id = parent.map(RemoteId::as_str).unwrap_or("root");
    let mime_clause = match kind {
        ResourceKind::Folder => format!("mimeType = '{}'", FOLDER_MIME),
        ResourceKind::File => format!("mimeType != '{}'", FOLDER_MIME),
    };
    format!(
        "name = '{}' and '{}' in parents and {} and trashed = false",
        escaped, parent_id, mime_clause
    )
}

/// Maps a non-success Drive response to the domain error.
///
/// The "API not enabled" condition surfaces as a 403 whose error reason is
/// `accessNotConfigured` (older responses only carry the "has not been
/// used" message text). That is a fatal configuration problem the user must
/// fix in the cloud console, so it gets its own variant.
fn classify_failure(status: StatusCode, body: &str) -> CoreError {
    let parsed: Option<ErrorDetail> = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error);

    if status == StatusCode::FORBIDDEN {
        let reason_matches = parsed
            .as_ref()
            .map(|e| {
                e.errors
                    .iter()
                    .any(|i| i.reason.as_deref() == Some("accessNotConfigured"))
            })
            .unwrap_or(false);
        let message_matches = parsed
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .map(|m| m.contains("has not been used"))
            .unwrap_or(false);
        if reason_matches || message_matches {
            return CoreError::ApiDisabled;
        }
    }

    let message = parsed
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());
    CoreError::RemoteRequestFailed(format!("{}: {}", status, message))
}

// ============================================================================
// RemoteStore implementation
// ============================================================================

#[async_trait::async_trait]
impl RemoteStore for DriveClient {
    async fn find_child(
        &self,
        token: &AccessToken,
        name: &str,
        parent: Option<&RemoteId>,
        kind: ResourceKind,
    ) -> Result<Option<RemoteId>, CoreError> {
        self.ensure_online().await?;

        let query = child_query(name, parent, kind);
        debug!(%query, "Searching for remote child");

        let list: FileList = self
            .send(
                self.request(Method::GET, "/files", token)
                    .query(&[("q", query.as_str()), ("fields", "files(id, name)")]),
            )
            .await?
            .json()
            .await
            .map_err(|e| {
                CoreError::RemoteRequestFailed(format!("Failed to parse search response: {}", e))
            })?;

        // more than one match is not specially handled; the first wins
        Ok(list.files.into_iter().next().map(|f| RemoteId::new(f.id)))
    }

    async fn create_folder(
        &self,
        token: &AccessToken,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteId, CoreError> {
        self.ensure_online().await?;

        let mut metadata = json!({
            "name": name,
            "mimeType": FOLDER_MIME,
        });
        if let Some(parent) = parent {
            metadata["parents"] = json!([parent.as_str()]);
        }

        let created: FileRef = self
            .send(self.request(Method::POST, "/files", token).json(&metadata))
            .await?
            .json()
            .await
            .map_err(|e| {
                CoreError::RemoteRequestFailed(format!("Failed to parse create response: {}", e))
            })?;

        debug!(id = %created.id, name, "Created remote folder");
        Ok(RemoteId::new(created.id))
    }

    async fn create_file(
        &self,
        token: &AccessToken,
        name: &str,
        parent: &RemoteId,
        content: &str,
    ) -> Result<RemoteId, CoreError> {
        self.ensure_online().await?;

        let metadata = json!({
            "name": name,
            "parents": [parent.as_str()],
            "mimeType": "application/json",
        });

        // metadata and content go in one multipart request; a failed create
        // cannot leave an empty document behind to be adopted later
        let created: FileRef = self
            .send(
                self.upload_request(Method::POST, "/files", token)
                    .query(&[("uploadType", "multipart")])
                    .header(
                        "Content-Type",
                        format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
                    )
                    .body(multipart_related_body(&metadata, content)),
            )
            .await?
            .json()
            .await
            .map_err(|e| {
                CoreError::RemoteRequestFailed(format!("Failed to parse create response: {}", e))
            })?;

        debug!(id = %created.id, name, "Created remote file");
        Ok(RemoteId::new(created.id))
    }

    async fn get_parents(
        &self,
        token: &AccessToken,
        id: &RemoteId,
    ) -> Result<Vec<RemoteId>, CoreError> {
        self.ensure_online().await?;

        let path = format!("/files/{}", id.as_str());
        let parents: FileParents = self
            .send(
                self.request(Method::GET, &path, token)
                    .query(&[("fields", "parents")]),
            )
            .await?
            .json()
            .await
            .map_err(|e| {
                CoreError::RemoteRequestFailed(format!("Failed to parse parents response: {}", e))
            })?;

        Ok(parents.parents.into_iter().map(RemoteId::new).collect())
    }

    async fn set_parents(
        &self,
        token: &AccessToken,
        id: &RemoteId,
        add: &RemoteId,
        remove: &[RemoteId],
    ) -> Result<(), CoreError> {
        self.ensure_online().await?;

        let path = format!("/files/{}", id.as_str());
        let mut builder = self
            .request(Method::PATCH, &path, token)
            .query(&[("addParents", add.as_str())])
            .json(&json!({}));

        if !remove.is_empty() {
            let remove_list = remove
                .iter()
                .map(RemoteId::as_str)
                .collect::<Vec<_>>()
                .join(",");
            builder = builder.query(&[("removeParents", remove_list.as_str())]);
        }

        self.send(builder).await?;

        debug!(id = %id, add = %add, "Updated remote parents");
        Ok(())
    }

    async fn read_file(&self, token: &AccessToken, id: &RemoteId) -> Result<String, CoreError> {
        self.ensure_online().await?;

        let path = format!("/files/{}", id.as_str());
        let content = self
            .send(
                self.request(Method::GET, &path, token)
                    .query(&[("alt", "media")]),
            )
            .await?
            .text()
            .await
            .map_err(|e| {
                CoreError::RemoteRequestFailed(format!("Failed to read file content: {}", e))
            })?;

        debug!(id = %id, bytes = content.len(), "Read remote file");
        Ok(content)
    }

    async fn overwrite_file(
        &self,
        token: &AccessToken,
        id: &RemoteId,
        content: &str,
    ) -> Result<(), CoreError> {
        self.ensure_online().await?;

        let path = format!("/files/{}", id.as_str());
        self.send(
            self.upload_request(Method::PATCH, &path, token)
                .query(&[("uploadType", "media")])
                .header("Content-Type", "application/json")
                .body(content.to_string()),
        )
        .await?;

        debug!(id = %id, bytes = content.len(), "Overwrote remote file");
        Ok(())
    }
}
