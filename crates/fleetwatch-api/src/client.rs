// Hand-crafted async HTTP client for the fleet-management REST API.
//
// Base path: /api/
// Auth: Authorization: Bearer <token>, read from the shared TokenCell
// on every request.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::token::TokenCell;
use crate::transport::TransportConfig;
use crate::types::{Agent, AgentList, ReportDetail, ReportList, ReportQuery, TokenResponse};

// ── Error response shape ─────────────────────────────────────────────

/// FastAPI-style error body: `{ "detail": "..." }`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
}

/// First ~200 bytes of a response body, cut back to a character boundary.
fn body_preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the fleet-management API.
///
/// The single chokepoint for all remote calls. Every authenticated
/// operation checks the [`TokenCell`] before any network I/O and attaches
/// the token as a bearer credential. Response mapping: 401/403 become
/// [`Error::AuthRejected`], other non-2xx become [`Error::RequestFailed`].
pub struct FleetClient {
    http: reqwest::Client,
    base_url: Url,
    token: TokenCell,
}

impl FleetClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server base URL, transport config, and token slot.
    pub fn new(base_url: &str, transport: &TransportConfig, token: TokenCell) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url, token })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client, token: TokenCell) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url, token })
    }

    /// Ensure the base URL ends with `/api/` so relative joins work.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    /// The token slot this client reads from.
    pub fn token(&self) -> &TokenCell {
        &self.token
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"agents"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/api/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    /// Resolve the current bearer header, or fail before any I/O.
    fn bearer(&self) -> Result<HeaderValue, Error> {
        let token = self.token.get().ok_or(Error::Unauthenticated)?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Unauthenticated)?;
        value.set_sensitive(true);
        Ok(value)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        let bearer = self.bearer()?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        let bearer = self.bearer()?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, bearer)
            .query(params)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path);
        let bearer = self.bearer()?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, bearer)
            .json(body)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = body_preview(&body);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::AuthRejected;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::RequestFailed {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Auth ─────────────────────────────────────────────────────────

    /// Authenticate with username + password.
    ///
    /// The only unauthenticated call. Returns the issued token; the caller
    /// decides whether to activate it in the shared slot.
    pub async fn login(
        &self,
        username: &str,
        password: &secrecy::SecretString,
    ) -> Result<TokenResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            username: &'a str,
            password: &'a str,
        }

        let url = self.url("auth/login");
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&Body {
                username,
                password: password.expose_secret(),
            })
            .send()
            .await?;
        self.handle_response(resp).await
    }

    // ── Agents ───────────────────────────────────────────────────────

    pub async fn list_agents(&self) -> Result<AgentList, Error> {
        self.get("agents").await
    }

    pub async fn get_agent(&self, agent_id: &str) -> Result<Agent, Error> {
        self.get(&format!("agents/{agent_id}")).await
    }

    // ── Reports ──────────────────────────────────────────────────────

    pub async fn list_reports(&self, query: &ReportQuery) -> Result<ReportList, Error> {
        self.get_with_params("reports", &query.to_params()).await
    }

    pub async fn get_report(&self, report_id: &str) -> Result<ReportDetail, Error> {
        self.get(&format!("reports/{report_id}")).await
    }

    // ── Scan commands ────────────────────────────────────────────────

    /// Request a scan on one agent. The 2xx ack body is ignored -- this is
    /// a request to start scanning, not a synchronous scan result.
    pub async fn trigger_scan(&self, agent_id: &str) -> Result<(), Error> {
        self.post_no_response(&format!("agents/{agent_id}/scan"), &serde_json::json!({}))
            .await
    }

    /// Request a scan across the whole fleet.
    pub async fn trigger_scan_all(&self) -> Result<(), Error> {
        self.post_no_response("agents/scan", &serde_json::json!({}))
            .await
    }
}
