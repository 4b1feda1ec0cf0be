//! OAuth2 PKCE authentication flow for Google Drive
//!
//! Implements the Authorization Code flow with PKCE (RFC 7636) for
//! authenticating a native application against Google's identity platform.
//!
//! ## Components
//!
//! - [`OAuth2Config`] - Configuration for the OAuth2 flow
//! - [`PkceFlow`] - OAuth2 PKCE challenge/exchange logic
//! - [`LocalCallbackServer`] - Minimal HTTP server for the OAuth redirect
//! - [`DriveAuthAdapter`] - Orchestrates the full handshake
//!
//! The adapter returns a bare bearer token; it is never written anywhere
//! durable and lives only as long as the session manager holds it.

use anyhow::{Context, Result};
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, CsrfToken, EndpointNotSet,
    EndpointSet, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use tracing::{debug, info, warn};

use painlog_core::domain::CoreError;
use painlog_core::ports::{AccessToken, AuthHandshake};

/// Google OAuth2 authorization endpoint
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth2 token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default redirect URI for the local callback server
const REDIRECT_URI: &str = "http://127.0.0.1:8400/callback";

/// The single scope requested: per-file access to files the app creates
const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

// ============================================================================
// OAuth2Config
// ============================================================================

/// Configuration for the OAuth2 PKCE authentication flow
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// OAuth client ID from the Google Cloud console
    pub client_id: String,
    /// Redirect URI for receiving the authorization code
    pub redirect_uri: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl OAuth2Config {
    /// Creates a new OAuth2Config with the given client id and defaults
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: REDIRECT_URI.to_string(),
            scopes: vec![DRIVE_FILE_SCOPE.to_string()],
        }
    }

    /// Creates a config with a custom redirect URI
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }
}

// ============================================================================
// PkceFlow
// ============================================================================

/// OAuth2 PKCE flow implementation using the `oauth2` crate
///
/// Handles generating authorization URLs with PKCE challenges and
/// exchanging authorization codes for tokens.
pub struct PkceFlow {
    client: BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
    scopes: Vec<String>,
}

impl PkceFlow {
    /// Creates a new PkceFlow with the given configuration
    pub fn new(config: &OAuth2Config) -> Result<Self> {
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string()).context("Invalid authorization URL")?)
            .set_token_uri(TokenUrl::new(TOKEN_URL.to_string()).context("Invalid token URL")?)
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri.clone()).context("Invalid redirect URI")?,
            );

        Ok(Self {
            client,
            scopes: config.scopes.clone(),
        })
    }

    /// Generates an authorization URL with a PKCE challenge
    ///
    /// # Returns
    /// A tuple of `(authorization_url, csrf_token, pkce_verifier)`.
    /// The `pkce_verifier` must be kept until the code exchange step.
    pub fn generate_auth_url(&self) -> (String, CsrfToken, PkceCodeVerifier) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = self.client.authorize_url(CsrfToken::new_random);

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request.set_pkce_challenge(pkce_challenge).url();

        debug!("Generated authorization URL");
        (auth_url.to_string(), csrf_token, pkce_verifier)
    }

    /// Exchanges an authorization code for a bearer token
    pub async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<AccessToken> {
        info!("Exchanging authorization code for token");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&http_client)
            .await
            .context("Failed to exchange authorization code")?;

        info!("Successfully obtained access token");
        Ok(AccessToken::new(
            token_result.access_token().secret().to_string(),
        ))
    }
}

// ============================================================================
// LocalCallbackServer
// ============================================================================

/// Minimal HTTP server that listens on localhost for the OAuth2 redirect.
///
/// Starts an HTTP server on `127.0.0.1:8400` that waits for the provider to
/// redirect the user's browser back with either an authorization code or an
/// `error` parameter. Once a result is received, it responds with a small
/// HTML page and shuts down.
pub struct LocalCallbackServer;

/// Parameters extracted from the OAuth2 callback
#[derive(Debug)]
pub struct CallbackParams {
    /// The authorization code, if the user approved
    pub code: Option<String>,
    /// The provider's error code, if the user denied or the flow failed
    pub error: Option<String>,
    /// The CSRF state parameter
    pub state: String,
}

impl LocalCallbackServer {
    /// Starts the local callback server and waits for the OAuth redirect
    pub async fn start() -> Result<CallbackParams> {
        use http_body_util::Full;
        use hyper::body::Bytes;
        use hyper::server::conn::http1;
        use hyper::service::service_fn;
        use hyper::{Request, Response, StatusCode};
        use hyper_util::rt::TokioIo;
        use tokio::net::TcpListener;
        use tokio::sync::oneshot;

        info!("Starting local OAuth callback server on 127.0.0.1:8400");

        let listener = TcpListener::bind("127.0.0.1:8400")
            .await
            .context("Failed to bind callback server to 127.0.0.1:8400")?;

        fn html_response(status: StatusCode, html: String) -> Response<Full<Bytes>> {
            let mut response = Response::new(Full::new(Bytes::from(html)));
            *response.status_mut() = status;
            response.headers_mut().insert(
                hyper::header::CONTENT_TYPE,
                hyper::header::HeaderValue::from_static("text/html; charset=utf-8"),
            );
            response
        }

        let (tx, rx) = oneshot::channel::<CallbackParams>();
        let tx = std::sync::Arc::new(tokio::sync::Mutex::new(Some(tx)));

        // Accept a single connection
        let (stream, _addr) = listener
            .accept()
            .await
            .context("Failed to accept connection on callback server")?;

        let io = TokioIo::new(stream);
        let tx_clone = tx.clone();

        let service = service_fn(move |req: Request<hyper::body::Incoming>| {
            let tx_inner = tx_clone.clone();
            async move {
                let uri = req.uri().to_string();
                debug!("Callback server received request: {}", uri);

                match parse_callback_params(&uri) {
                    Some(params) => {
                        let denied = params.error.is_some();
                        if let Some(sender) = tx_inner.lock().await.take() {
                            let _ = sender.send(params);
                        }

                        let html = if denied {
                            error_html("Authorization was not granted")
                        } else {
                            success_html()
                        };
                        Ok::<_, hyper::Error>(html_response(StatusCode::OK, html))
                    }
                    None => {
                        let html = error_html("Missing authorization code in callback");
                        Ok(html_response(StatusCode::BAD_REQUEST, html))
                    }
                }
            }
        });

        // Serve the single connection
        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!("Callback server connection error: {}", e);
            }
        });

        let params = rx
            .await
            .context("Callback server channel closed without receiving parameters")?;

        info!("Received OAuth callback");
        Ok(params)
    }
}

/// Parses the authorization code, error, and state from a callback URI
fn parse_callback_params(uri: &str) -> Option<CallbackParams> {
    let url = url::Url::parse(&format!("http://localhost{}", uri)).ok()?;
    let mut code = None;
    let mut error = None;
    let mut state = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "error" => error = Some(value.to_string()),
            "state" => state = Some(value.to_string()),
            _ => {}
        }
    }

    if code.is_none() && error.is_none() {
        return None;
    }

    Some(CallbackParams {
        code,
        error,
        state: state.unwrap_or_default(),
    })
}

/// Returns the HTML for a successful authorization page
fn success_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>Painlog - Authorization Successful</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Authorization Successful</h1>
    <p>Painlog is now connected to your Google Drive.</p>
    <p>You can close this window and return to Painlog.</p>
    <script>setTimeout(function() { window.close(); }, 3000);</script>
</body>
</html>"#
        .to_string()
}

/// Returns the HTML for an authorization error page
fn error_html(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Painlog - Authorization Error</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Authorization Error</h1>
    <p>{}</p>
    <p>Please close this window and try again.</p>
</body>
</html>"#,
        message
    )
}

// ============================================================================
// DriveAuthAdapter
// ============================================================================

/// High-level authentication adapter that orchestrates the full PKCE flow.
///
/// Combines [`PkceFlow`], [`LocalCallbackServer`], and browser launching:
///
/// 1. Generates a PKCE authorization URL
/// 2. Opens the user's browser to the Google consent page
/// 3. Starts a local callback server to receive the redirect
/// 4. Exchanges the authorization code for a bearer token
///
/// Failure classification: an explicit `access_denied` from the provider
/// maps to `AccessDenied`; every other failure maps to `AuthFailed` with
/// the underlying message.
pub struct DriveAuthAdapter {
    config: OAuth2Config,
}

impl DriveAuthAdapter {
    /// Creates a new DriveAuthAdapter with the given configuration
    pub fn new(config: OAuth2Config) -> Self {
        Self { config }
    }

    /// Creates a new DriveAuthAdapter with just a client id
    pub fn with_client_id(client_id: impl Into<String>) -> Self {
        Self {
            config: OAuth2Config::new(client_id),
        }
    }

    /// Returns a reference to the current configuration
    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    async fn run_flow(&self) -> Result<AccessToken, CoreError> {
        let flow =
            PkceFlow::new(&self.config).map_err(|e| CoreError::AuthFailed(e.to_string()))?;

        // Step 1: Generate authorization URL with PKCE
        let (auth_url, _csrf_token, pkce_verifier) = flow.generate_auth_url();

        // Step 2: Open the browser
        info!("Opening browser for authorization");
        webbrowser::open(&auth_url)
            .map_err(|e| CoreError::AuthFailed(format!("Failed to open browser: {}", e)))?;

        // Step 3: Start local callback server and wait for redirect
        let callback = LocalCallbackServer::start()
            .await
            .map_err(|e| CoreError::AuthFailed(e.to_string()))?;

        if let Some(error) = callback.error {
            return Err(classify_callback_error(&error));
        }

        let code = callback
            .code
            .ok_or_else(|| CoreError::AuthFailed("Callback carried no code".to_string()))?;

        // Step 4: Exchange authorization code for the token
        flow.exchange_code(code, pkce_verifier)
            .await
            .map_err(|e| CoreError::AuthFailed(e.to_string()))
    }
}

/// Maps a provider callback error code to the domain error
fn classify_callback_error(error: &str) -> CoreError {
    if error == "access_denied" {
        CoreError::AccessDenied
    } else {
        CoreError::AuthFailed(error.to_string())
    }
}

#[async_trait::async_trait]
impl AuthHandshake for DriveAuthAdapter {
    async fn authorize(&self) -> Result<AccessToken, CoreError> {
        info!("Starting OAuth2 PKCE handshake");
        let token = self.run_flow().await?;
        info!("OAuth2 PKCE handshake completed");
        Ok(token)
    }
}
