//! SQLite connection pool and schema setup
//!
//! The journal lives in a single database file under the user's data
//! directory; the pool creates it (and its parent directory) on first use,
//! switches it to WAL mode, and applies the embedded schema before handing
//! out connections.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::StoreError;

const SCHEMA_SQL: &str = include_str!("migrations/20260815_initial.sql");

fn connect_err(what: impl std::fmt::Display, e: impl std::fmt::Display) -> StoreError {
    StoreError::ConnectionFailed(format!("{}: {}", what, e))
}

/// Pool of SQLite connections backing [`SqliteRecordStore`](crate::SqliteRecordStore)
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Opens (creating if needed) the journal database at `db_path`.
    ///
    /// Returns `StoreError::ConnectionFailed` if the file or its directory
    /// cannot be opened, `StoreError::MigrationFailed` if the schema cannot
    /// be applied.
    pub async fn new(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                connect_err(
                    format!("Failed to create data directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                connect_err(format!("Failed to open database at {}", db_path.display()), e)
            })?;

        Self::apply_schema(&pool).await?;

        tracing::info!(path = %db_path.display(), "Database pool initialized");
        Ok(Self { pool })
    }

    /// Opens an in-memory database for tests.
    ///
    /// Capped at one connection: an in-memory SQLite database is
    /// per-connection, so a second connection would see an empty schema.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| connect_err("Failed to create in-memory database", e))?;

        Self::apply_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns the underlying SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn apply_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("Schema setup failed: {}", e)))?;

        tracing::debug!("Database schema applied");
        Ok(())
    }
}
