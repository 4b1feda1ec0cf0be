//! Use cases (application services) orchestrating domain logic over ports

pub mod backup;
pub mod export_records;
pub mod import_records;
pub mod provision;
pub mod restore;
pub mod status;

#[cfg(test)]
pub(crate) mod support;

pub use backup::Backup;
pub use export_records::ExportRecords;
pub use import_records::{decide, ImportRecords, MergeDecision};
pub use provision::{ProvisionedTarget, RemoteProvisioner};
pub use restore::{Restore, RestoreOutcome};
pub use status::FetchStatus;
