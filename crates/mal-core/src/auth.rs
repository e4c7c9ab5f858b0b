//! OAuth2 PKCE authorization against MyAnimeList.
//!
//! MAL only implements the `plain` challenge method, so the challenge sent
//! in the authorize URL is the verifier itself. The redirect is captured by
//! a one-shot HTTP listener on a fixed local port; at most one flow runs per
//! process.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Router;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot, Mutex};
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::error::Error;
use crate::token::Credential;

const AUTH_URL: &str = "https://myanimelist.net/v1/oauth2/authorize";
const TOKEN_URL: &str = "https://myanimelist.net/v1/oauth2/token";
const CALLBACK_ADDR: &str = "0.0.0.0:8089";
const REDIRECT_URI: &str = "http://localhost:8089";
/// Bound on how long one callback request may take to read and answer.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

const VERIFIER_LEN: usize = 128;
/// RFC 7636 unreserved characters.
const VERIFIER_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Random 128-character PKCE code verifier.
pub fn new_code_verifier() -> String {
    let mut rng = rand::thread_rng();
    (0..VERIFIER_LEN)
        .map(|_| VERIFIER_CHARS[rng.gen_range(0..VERIFIER_CHARS.len())] as char)
        .collect()
}

/// Consent-page URL carrying the client id and the PKCE challenge.
pub fn auth_code_url(client_id: &str, challenge: &str) -> String {
    format!(
        "{AUTH_URL}?response_type=code\
         &client_id={client_id}\
         &state=malwatch\
         &code_challenge={challenge}\
         &code_challenge_method=plain"
    )
}

/// Run the whole flow: build the URL, open the browser, capture the
/// redirect on the local listener, exchange the code for a credential.
pub async fn authorize(client_id: &str) -> Result<Credential, Error> {
    if client_id.is_empty() {
        return Err(Error::MissingClientId);
    }

    let verifier = new_code_verifier();
    let url = auth_code_url(client_id, &verifier);

    info!(%url, "opening MAL consent page");
    if let Err(e) = open::that(&url) {
        warn!("could not open a browser ({e}); navigate to the logged URL manually");
    }

    let code = wait_for_code().await?;
    if code.is_empty() {
        return Err(Error::Listener(
            "redirect carried no authorization code".to_string(),
        ));
    }

    exchange_code(client_id, &code, &verifier).await
}

#[derive(Clone)]
struct CallbackState {
    code_tx: mpsc::Sender<String>,
    shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    #[serde(default)]
    code: String,
}

/// One-shot callback server. Binds the fixed port, serves until the first
/// request has been answered, then shuts down and yields the captured code.
/// The socket is released on every exit path.
async fn wait_for_code() -> Result<String, Error> {
    let (code_tx, mut code_rx) = mpsc::channel::<String>(1);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let state = CallbackState {
        code_tx,
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };

    // Single catch-all route: any path, any method, code in the query string
    // or a form-encoded body.
    let app = Router::new()
        .fallback(callback)
        .layer(TimeoutLayer::new(CALLBACK_TIMEOUT))
        .with_state(state);

    let listener = TcpListener::bind(CALLBACK_ADDR)
        .await
        .map_err(|e| Error::Listener(format!("bind {CALLBACK_ADDR}: {e}")))?;

    info!("waiting for the OAuth callback on {CALLBACK_ADDR}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .map_err(|e| Error::Listener(e.to_string()))?;

    // The handler sends the code before it signals shutdown, so once serve()
    // has returned the channel already holds the value.
    code_rx
        .recv()
        .await
        .ok_or_else(|| Error::Listener("listener stopped without a callback".to_string()))
}

async fn callback(
    State(state): State<CallbackState>,
    Form(params): Form<CallbackParams>,
) -> (StatusCode, Html<&'static str>) {
    info!("OAuth callback received");

    // Send first, then initiate shutdown: serve() must not be able to
    // return before the code is in the handoff channel.
    let _ = state.code_tx.try_send(params.code);
    if let Some(tx) = state.shutdown_tx.lock().await.take() {
        let _ = tx.send(());
    }

    (
        StatusCode::OK,
        Html(
            "<html><body><h2>Authorization complete.</h2>\
             <p>You can close this tab and return to the terminal.</p></body></html>",
        ),
    )
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_credential(self, now: DateTime<Utc>) -> Credential {
        Credential {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_in.map(|secs| now + chrono::Duration::seconds(secs)),
        }
    }
}

/// Exchange the authorization code (plus the original verifier) for tokens.
async fn exchange_code(client_id: &str, code: &str, verifier: &str) -> Result<Credential, Error> {
    let http = reqwest::Client::new();
    let resp = http
        .post(TOKEN_URL)
        .form(&[
            ("client_id", client_id),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", REDIRECT_URI),
        ])
        .send()
        .await
        .map_err(|e| Error::Exchange(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Exchange(format!("status {status}: {body}")));
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| Error::Exchange(e.to_string()))?;

    Ok(token.into_credential(Utc::now()))
}
