//! Painlog Store - Local persistence
//!
//! SQLite-based storage for:
//! - Pain records (the journal itself)
//! - Sync metadata (remote ids, last backup/restore instants)
//!
//! ## Architecture
//!
//! This crate implements the `RecordStore` port from `painlog-core` using
//! SQLite as the storage backend. It is a driven (secondary) adapter in the
//! hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteRecordStore`] - Full `RecordStore` implementation
//! - [`StoreError`] - Pool setup error types
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use painlog_store::{DatabasePool, SqliteRecordStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/home/user/.local/share/painlog/painlog.db")).await?;
//! let store = SqliteRecordStore::new(pool.pool().clone());
//! // Use store as RecordStore...
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod repository;

pub use pool::DatabasePool;
pub use repository::SqliteRecordStore;

/// Errors that can occur while setting up the database
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}
