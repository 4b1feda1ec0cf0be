//! Network reachability probe
//!
//! Implements the `Connectivity` port with a plain TCP dial. Every
//! authenticated remote call checks this first so an unplugged machine
//! fails fast with `Offline` instead of waiting out a transport timeout.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use painlog_core::ports::Connectivity;

/// Default probe target: Google's API front door
const DEFAULT_PROBE_ADDR: &str = "www.googleapis.com:443";

/// How long a dial may take before the network counts as unreachable
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// TCP-dial reachability probe
pub struct HttpConnectivity {
    probe_addr: String,
}

impl HttpConnectivity {
    /// Creates a probe against the default Google endpoint
    pub fn new() -> Self {
        Self {
            probe_addr: DEFAULT_PROBE_ADDR.to_string(),
        }
    }

    /// Creates a probe against a custom `host:port` (useful for testing)
    pub fn with_probe_addr(probe_addr: impl Into<String>) -> Self {
        Self {
            probe_addr: probe_addr.into(),
        }
    }
}

impl Default for HttpConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Connectivity for HttpConnectivity {
    async fn is_online(&self) -> bool {
        let online = matches!(
            tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect(&self.probe_addr)).await,
            Ok(Ok(_))
        );
        debug!(addr = %self.probe_addr, online, "Connectivity probe");
        online
    }
}
