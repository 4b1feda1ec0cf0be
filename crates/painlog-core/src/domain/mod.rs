//! Domain entities and value types

pub mod envelope;
pub mod errors;
pub mod metadata;
pub mod record;
pub mod status;

pub use envelope::{ExportEnvelope, ExportOptions, ImportEnvelope, RecordDto, SCHEMA_VERSION};
pub use errors::CoreError;
pub use metadata::MetadataKey;
pub use record::{FieldValue, NewRecord, PainRecord, RecordId, RecordPatch};
pub use status::SyncStatus;
