//! CLI command implementations
//!
//! One module per subcommand, plus shared wiring helpers that assemble the
//! store, session, and remote adapters from the loaded configuration.

pub mod add;
pub mod backup;
pub mod edit;
pub mod export;
pub mod list;
pub mod remove;
pub mod restore;
pub mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use painlog_core::config::Config;
use painlog_core::domain::FieldValue;
use painlog_core::ports::Connectivity;
use painlog_core::session::SessionManager;
use painlog_core::usecases::RemoteProvisioner;
use painlog_drive::{DriveAuthAdapter, DriveClient, HttpConnectivity};
use painlog_store::{DatabasePool, SqliteRecordStore};

/// Opens (creating if needed) the local database configured in `config`
pub(crate) async fn open_store(config: &Config) -> Result<Arc<SqliteRecordStore>> {
    let pool = DatabasePool::new(&config.database.path)
        .await
        .context("Failed to open database")?;
    Ok(Arc::new(SqliteRecordStore::new(pool.pool().clone())))
}

/// Builds the session manager from the configured OAuth client id.
///
/// Without a client id the session is unconfigured and every remote
/// operation reports that sync has not been set up yet.
pub(crate) fn build_session(config: &Config) -> Arc<SessionManager> {
    let connectivity: Arc<dyn Connectivity> = Arc::new(HttpConnectivity::new());
    match config.auth.client_id.as_deref() {
        Some(client_id) => Arc::new(SessionManager::new(
            Arc::new(DriveAuthAdapter::with_client_id(client_id)),
            connectivity,
        )),
        None => Arc::new(SessionManager::unconfigured(connectivity)),
    }
}

/// Assembles the full remote stack used by backup and restore
pub(crate) fn build_remote(
    config: &Config,
    store: Arc<SqliteRecordStore>,
) -> (Arc<DriveClient>, RemoteProvisioner) {
    let remote = Arc::new(DriveClient::new(Arc::new(HttpConnectivity::new())));
    let provisioner = RemoteProvisioner::new(
        store,
        remote.clone(),
        config.remote.folder_name.clone(),
        config.remote.file_name.clone(),
    );
    (remote, provisioner)
}

/// Builds a categorical value from a key plus its optional free text
pub(crate) fn field_value(key: &str, text: Option<&str>) -> FieldValue {
    match text {
        Some(text) => FieldValue::with_custom_text(key, text),
        None => FieldValue::new(key),
    }
}

/// Parses a user-supplied instant: RFC 3339, or the literal "now"
pub(crate) fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    if value == "now" {
        return Ok(Utc::now());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp '{}', expected RFC 3339 or 'now'", value))
}
