//! Session ports (driven/secondary ports)
//!
//! Two small traits back the session manager: the interactive authorization
//! handshake with the identity provider, and a network reachability probe.

use crate::domain::CoreError;
use crate::ports::remote_store::AccessToken;

/// Port trait for the interactive authorization handshake.
///
/// Implementations drive the full user-facing flow (browser, redirect,
/// code exchange) and classify its failures: explicit user denial maps to
/// `AccessDenied`, anything else to `AuthFailed` carrying the provider's
/// message.
#[async_trait::async_trait]
pub trait AuthHandshake: Send + Sync {
    async fn authorize(&self) -> Result<AccessToken, CoreError>;
}

/// Port trait for network reachability.
///
/// Checked before every authenticated remote call so unreachable networks
/// fail fast with `Offline` instead of waiting out a transport timeout.
#[async_trait::async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}
