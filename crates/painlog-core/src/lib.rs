//! Painlog Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `PainRecord`, `ExportEnvelope`, `MetadataKey`, `SyncStatus`
//! - **Use cases** - `Backup`, `Restore`, `FetchStatus`, the merge engine
//!   (`import_records`), exports (`export_records`) and the remote
//!   provisioner (`RemoteProvisioner`)
//! - **Port definitions** - Traits for adapters: `RecordStore`, `RemoteStore`,
//!   `AuthHandshake`, `Connectivity`
//! - **Session manager** - Process-lifetime bearer token lifecycle
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O dependencies.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod session;
pub mod usecases;
