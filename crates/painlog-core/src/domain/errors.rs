//! Domain error taxonomy
//!
//! Every failure the core can surface is one of these variants. All of them
//! except [`CoreError::Storage`] are recoverable and are collapsed into a
//! single user-facing message at the orchestrator boundary; storage failures
//! are fatal because there is no local recovery strategy below the store.

use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Update or lookup on a record id that does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Malformed import/restore payload; nothing was applied
    #[error("Invalid export format: {0}")]
    InvalidFormat(String),

    /// Remote feature used before an OAuth client id was configured
    #[error("Remote sync is not configured")]
    NotConfigured,

    /// No network reachability; checked before every authenticated call
    #[error("Network is unreachable")]
    Offline,

    /// The user declined the authorization prompt
    #[error("Access denied by user")]
    AccessDenied,

    /// Authorization handshake failed for any other reason
    #[error("Authorization failed: {0}")]
    AuthFailed(String),

    /// The remote service is not enabled for the configured identity
    #[error("Remote API is disabled for this client")]
    ApiDisabled,

    /// Any other non-success remote response
    #[error("Remote request failed: {0}")]
    RemoteRequestFailed(String),

    /// Storage-layer I/O failure (fatal, surfaced as-is)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Collapses the error into the single message shown to the user.
    ///
    /// Classified remote/auth failures get actionable phrasing; storage
    /// failures pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::NotFound(id) => format!("No record with id {id} exists"),
            CoreError::InvalidFormat(_) => {
                "The backup document is not in a recognized format; nothing was imported"
                    .to_string()
            }
            CoreError::NotConfigured => {
                "Remote sync is not configured; set an OAuth client id first".to_string()
            }
            CoreError::Offline => "You appear to be offline; try again when connected".to_string(),
            CoreError::AccessDenied => "Authorization was declined".to_string(),
            CoreError::AuthFailed(msg) => format!("Could not sign in: {msg}"),
            CoreError::ApiDisabled => {
                "The Drive API is disabled for this client id; enable it in the provider console"
                    .to_string()
            }
            CoreError::RemoteRequestFailed(msg) => format!("The remote request failed: {msg}"),
            CoreError::Storage(msg) => msg.clone(),
        }
    }

    /// Returns true if the failure is fatal (no retry will help without
    /// outside intervention).
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Storage(_) | CoreError::ApiDisabled)
    }
}
