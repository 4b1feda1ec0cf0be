//! Painlog Drive - Google Drive remote adapter
//!
//! Implements the remote side of backup/restore against the Google Drive v3
//! API, plus the interactive OAuth2 PKCE handshake and a network
//! reachability probe.
//!
//! ## Architecture
//!
//! This crate implements three ports from `painlog-core`:
//!
//! - [`DriveClient`] - the `RemoteStore` port (files search/create/parents/
//!   content, restricted to the `drive.file` scope)
//! - [`DriveAuthAdapter`] - the `AuthHandshake` port (browser + local
//!   callback server + code exchange)
//! - [`HttpConnectivity`] - the `Connectivity` port (TCP reachability probe)
//!
//! Tokens live only in the process; nothing in this crate writes a
//! credential to disk.

pub mod auth;
pub mod client;
pub mod connectivity;

pub use auth::{DriveAuthAdapter, OAuth2Config};
pub use client::DriveClient;
pub use connectivity::HttpConnectivity;
