//! Session manager
//!
//! Owns the process-lifetime bearer token with an explicit
//! `NoToken -> Acquiring -> Held` lifecycle. The token is never written to
//! durable storage; restarting the process always starts at `NoToken`.
//! A failed handshake leaves no cached failure state — the next
//! `ensure_token` retries from scratch.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::CoreError;
use crate::ports::{AccessToken, AuthHandshake, Connectivity};

/// Observable phase of the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NoToken,
    Acquiring,
    Held,
}

enum SessionState {
    NoToken,
    Acquiring,
    Held(AccessToken),
}

impl SessionState {
    fn phase(&self) -> SessionPhase {
        match self {
            SessionState::NoToken => SessionPhase::NoToken,
            SessionState::Acquiring => SessionPhase::Acquiring,
            SessionState::Held(_) => SessionPhase::Held,
        }
    }
}

/// Acquires, caches, and invalidates the bearer token gating remote calls.
///
/// Constructed unconfigured when no OAuth client id is available, in which
/// case every `ensure_token` short-circuits with `NotConfigured`.
pub struct SessionManager {
    handshake: Option<Arc<dyn AuthHandshake>>,
    connectivity: Arc<dyn Connectivity>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    /// Creates a configured session manager
    pub fn new(handshake: Arc<dyn AuthHandshake>, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            handshake: Some(handshake),
            connectivity,
            state: Mutex::new(SessionState::NoToken),
        }
    }

    /// Creates an unconfigured session manager; all token requests fail
    /// with `NotConfigured` until the user supplies a client id.
    pub fn unconfigured(connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            handshake: None,
            connectivity,
            state: Mutex::new(SessionState::NoToken),
        }
    }

    /// Returns true if an OAuth client id is configured
    pub fn is_configured(&self) -> bool {
        self.handshake.is_some()
    }

    /// Returns the current lifecycle phase
    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase()
    }

    /// Returns the cached token or drives the interactive handshake.
    ///
    /// The state lock is held across the handshake, so concurrent callers
    /// serialize on a single authorization prompt.
    pub async fn ensure_token(&self) -> Result<AccessToken, CoreError> {
        let handshake = self.handshake.as_ref().ok_or(CoreError::NotConfigured)?;

        let mut state = self.state.lock().await;
        if let SessionState::Held(token) = &*state {
            debug!("Reusing cached access token");
            return Ok(token.clone());
        }

        *state = SessionState::Acquiring;

        if !self.connectivity.is_online().await {
            *state = SessionState::NoToken;
            return Err(CoreError::Offline);
        }

        info!("No cached token, starting authorization handshake");
        match handshake.authorize().await {
            Ok(token) => {
                *state = SessionState::Held(token.clone());
                info!("Authorization handshake completed");
                Ok(token)
            }
            Err(e) => {
                // no cached failure state: the next call retries from scratch
                *state = SessionState::NoToken;
                warn!(error = %e, "Authorization handshake failed");
                Err(e)
            }
        }
    }

    /// Drops the cached token, returning the session to `NoToken`
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        *state = SessionState::NoToken;
        debug!("Session token invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    struct ScriptedHandshake {
        results: Mutex<VecDeque<Result<AccessToken, CoreError>>>,
        calls: AtomicU32,
    }

    impl ScriptedHandshake {
        fn new(results: Vec<Result<AccessToken, CoreError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AuthHandshake for ScriptedHandshake {
        async fn authorize(&self) -> Result<AccessToken, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .await
                .pop_front()
                .unwrap_or(Err(CoreError::AuthFailed("script exhausted".to_string())))
        }
    }

    struct FakeConnectivity(AtomicBool);

    #[async_trait::async_trait]
    impl Connectivity for FakeConnectivity {
        async fn is_online(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn online() -> Arc<FakeConnectivity> {
        Arc::new(FakeConnectivity(AtomicBool::new(true)))
    }

    #[tokio::test]
    async fn test_token_is_cached_after_first_handshake() {
        let handshake = Arc::new(ScriptedHandshake::new(vec![Ok(AccessToken::new("t1"))]));
        let session = SessionManager::new(handshake.clone(), online());

        let first = session.ensure_token().await.unwrap();
        let second = session.ensure_token().await.unwrap();

        assert_eq!(first.secret(), "t1");
        assert_eq!(second.secret(), "t1");
        assert_eq!(handshake.calls(), 1);
        assert_eq!(session.phase().await, SessionPhase::Held);
    }

    #[tokio::test]
    async fn test_denial_retries_from_scratch() {
        let handshake = Arc::new(ScriptedHandshake::new(vec![
            Err(CoreError::AccessDenied),
            Ok(AccessToken::new("t2")),
        ]));
        let session = SessionManager::new(handshake.clone(), online());

        let err = session.ensure_token().await.unwrap_err();
        assert_eq!(err, CoreError::AccessDenied);
        assert_eq!(session.phase().await, SessionPhase::NoToken);

        // no cached failure: the next call runs the handshake again
        let token = session.ensure_token().await.unwrap();
        assert_eq!(token.secret(), "t2");
        assert_eq!(handshake.calls(), 2);
    }

    #[tokio::test]
    async fn test_offline_fails_fast_without_handshake() {
        let handshake = Arc::new(ScriptedHandshake::new(vec![Ok(AccessToken::new("t"))]));
        let connectivity = Arc::new(FakeConnectivity(AtomicBool::new(false)));
        let session = SessionManager::new(handshake.clone(), connectivity);

        let err = session.ensure_token().await.unwrap_err();
        assert_eq!(err, CoreError::Offline);
        assert_eq!(handshake.calls(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_short_circuits() {
        let session = SessionManager::unconfigured(online());
        let err = session.ensure_token().await.unwrap_err();
        assert_eq!(err, CoreError::NotConfigured);
        assert!(!session.is_configured());
    }

    #[tokio::test]
    async fn test_invalidate_clears_token() {
        let handshake = Arc::new(ScriptedHandshake::new(vec![
            Ok(AccessToken::new("t1")),
            Ok(AccessToken::new("t2")),
        ]));
        let session = SessionManager::new(handshake.clone(), online());

        session.ensure_token().await.unwrap();
        session.invalidate().await;
        assert_eq!(session.phase().await, SessionPhase::NoToken);

        let token = session.ensure_token().await.unwrap();
        assert_eq!(token.secret(), "t2");
        assert_eq!(handshake.calls(), 2);
    }
}
