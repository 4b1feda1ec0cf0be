//! Port definitions (trait interfaces implemented by adapter crates)

pub mod record_store;
pub mod remote_store;
pub mod session;

pub use record_store::{RecordFilter, RecordStore, SortOrder};
pub use remote_store::{AccessToken, RemoteId, RemoteStore, ResourceKind};
pub use session::{AuthHandshake, Connectivity};
