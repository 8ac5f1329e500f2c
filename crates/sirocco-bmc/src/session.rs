//! Session handshake against the BMC web API
//!
//! Login is three calls: fetch a challenge nonce, POST credentials plus the
//! nonce as a form, then carry the returned session cookie and CSRF token
//! on every later request. Sessions are never refreshed; a worker that
//! outlives its session simply fails.

use std::time::Duration;

use reqwest::header;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BmcError, Result};
use crate::types::BmcConfig;

/// Agent string matching the vendor's own web client
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36 Edg/117.0.2045.60";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated session state for one BMC
///
/// Produced by [`BmcClient::login`] and threaded explicitly into every
/// subsequent call. A session is scoped to exactly one node and is never
/// shared across node workers.
#[derive(Debug, Clone)]
pub struct Session {
    session_id: String,
    csrf_token: String,
}

impl Session {
    pub(crate) fn new(session_id: String, csrf_token: String) -> Self {
        Self {
            session_id,
            csrf_token,
        }
    }

    /// Cookie header value in the shape the firmware expects
    pub fn cookie_header(&self) -> String {
        format!(
            "lang=zh-cn;QSESSIONID={}; refresh_disable=1",
            self.session_id
        )
    }

    /// Anti-forgery token to send as `X-Csrftoken`
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    random: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "CSRFToken")]
    csrf_token: String,
}

/// HTTP client bound to one BMC host
#[derive(Debug, Clone)]
pub struct BmcClient {
    http: Client,
    config: BmcConfig,
}

impl BmcClient {
    /// Build a client for the configured BMC
    pub fn new(config: BmcConfig) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http, config })
    }

    /// The BMC host this client talks to
    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("https://{}/api/{}", self.config.host, path)
    }

    /// Fetch the login challenge nonce
    pub async fn fetch_challenge(&self) -> Result<String> {
        let response = self.http.get(self.api_url("randomtag")).send().await?;
        let body: ChallengeResponse = response.json().await.map_err(|e| {
            BmcError::Protocol(format!("challenge response missing random tag: {e}"))
        })?;
        debug!(host = %self.config.host, "Fetched login challenge");
        Ok(body.random)
    }

    /// Exchange credentials plus the challenge for a session
    pub async fn authenticate(&self, challenge: &str) -> Result<Session> {
        let form = [
            ("encrypt_flag", "0"),
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
            ("login_tag", challenge),
        ];
        let response = self
            .http
            .post(self.api_url("session"))
            .form(&form)
            .send()
            .await?;

        let session_id = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(extract_session_id)
            .map(str::to_owned)
            .ok_or_else(|| BmcError::Auth("no QSESSIONID cookie in login response".to_string()))?;

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| BmcError::Auth(format!("login response missing CSRF token: {e}")))?;

        debug!(host = %self.config.host, "Authenticated");
        Ok(Session::new(session_id, body.csrf_token))
    }

    /// Full handshake: challenge fetch, then credential exchange
    pub async fn login(&self) -> Result<Session> {
        let challenge = self.fetch_challenge().await?;
        self.authenticate(&challenge).await
    }
}

/// Pull the QSESSIONID value out of a Set-Cookie header line
fn extract_session_id(set_cookie: &str) -> Option<&str> {
    set_cookie
        .split(';')
        .find_map(|part| part.trim().strip_prefix("QSESSIONID="))
}
