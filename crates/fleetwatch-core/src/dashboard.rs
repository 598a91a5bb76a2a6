// ── Dashboard facade ──
//
// The one entry point presentation layers talk to. Owns the gateway
// client, the session, the view router, and the resource caches, and
// enforces the cross-cutting rules: session-gated navigation, cache
// invalidation on successful commands, forced logout on a rejected token.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, warn};

use fleetwatch_api::{
    Agent, AgentList, FleetClient, ReportDetail, ReportList, ReportQuery, TransportConfig,
};

use crate::cache::ResourceCache;
use crate::command::{Command, CommandReceipt};
use crate::error::CoreError;
use crate::session::{Session, TokenStore};
use crate::view::{View, ViewRouter};

const AGENTS_KEY: &str = "agents";

fn agent_key(agent_id: &str) -> String {
    format!("agent:{agent_id}")
}

fn reports_key(agent_id: Option<&str>) -> String {
    match agent_id {
        Some(id) => format!("reports:{id}"),
        None => "reports:all".to_owned(),
    }
}

struct Inner {
    client: FleetClient,
    session: Session,
    router: ViewRouter,
    agents: ResourceCache<AgentList>,
    agent: ResourceCache<Agent>,
    reports: ResourceCache<ReportList>,
}

/// Cheaply cloneable handle to the dashboard state.
///
/// All reads go through keyed caches: repeated calls return the memoized
/// value until the entry is explicitly invalidated by a `refresh_*` call,
/// a successful [`Command`], or logout. Cached data never expires on its
/// own.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

impl Dashboard {
    /// Build against `base_url`, restoring any persisted session.
    ///
    /// A restored token skips the login screen; validity is only learned
    /// from the first authenticated request.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        store: Box<dyn TokenStore>,
    ) -> Result<Self, CoreError> {
        let session = Session::new(store)?;
        let client = FleetClient::new(base_url, transport, session.token_cell())?;
        Ok(Self::assemble(client, session))
    }

    /// Assemble from an already-built client and session.
    ///
    /// The client must read the session's token cell
    /// ([`Session::token_cell`]), or authenticated calls will not see
    /// logins performed through this dashboard.
    pub fn from_parts(client: FleetClient, session: Session) -> Self {
        Self::assemble(client, session)
    }

    fn assemble(client: FleetClient, session: Session) -> Self {
        let router = ViewRouter::new();
        if session.is_authenticated() {
            router.on_login();
        }
        Self {
            inner: Arc::new(Inner {
                client,
                session,
                router,
                agents: ResourceCache::new(),
                agent: ResourceCache::new(),
                reports: ResourceCache::new(),
            }),
        }
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Exchange credentials for a token, activate and persist it.
    ///
    /// On success the view moves to [`View::Agents`]. If the server
    /// accepted the credentials but durable storage failed, the session
    /// is still active in memory and the storage error is returned.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        let resp = self.inner.client.login(username, password).await?;
        debug!(username, "login accepted");
        let persisted = self
            .inner
            .session
            .set(SecretString::from(resp.access_token));
        self.inner.router.on_login();
        persisted
    }

    /// Activate a token issued out of band, without a credential exchange.
    pub fn adopt_token(&self, token: SecretString) -> Result<(), CoreError> {
        let persisted = self.inner.session.set(token);
        self.inner.router.on_login();
        persisted
    }

    /// End the session: drop the token, discard cached data, return to
    /// the login view. Cached resources belong to the departing session.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.drop_caches();
        let cleared = self.inner.session.clear();
        self.inner.router.on_logout();
        cleared
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn current_view(&self) -> View {
        self.inner.router.current()
    }

    pub fn watch_view(&self) -> tokio::sync::watch::Receiver<View> {
        self.inner.router.subscribe()
    }

    pub fn navigate(&self, view: View) -> Result<(), CoreError> {
        self.inner.router.navigate(view, self.is_authenticated())
    }

    // ── Resource reads ───────────────────────────────────────────────

    /// The agent roster. Memoized until invalidated.
    pub async fn agents(&self) -> Result<Arc<AgentList>, CoreError> {
        let inner = Arc::clone(&self.inner);
        let rx = self.inner.agents.get(AGENTS_KEY, move || async move {
            inner.client.list_agents().await.map_err(CoreError::from)
        });
        self.resolve(rx).await
    }

    /// One agent by id. Memoized per agent.
    pub async fn agent(&self, agent_id: &str) -> Result<Arc<Agent>, CoreError> {
        let inner = Arc::clone(&self.inner);
        let id = agent_id.to_owned();
        let rx = self.inner.agent.get(&agent_key(agent_id), move || async move {
            inner.client.get_agent(&id).await.map_err(CoreError::from)
        });
        self.resolve(rx).await
    }

    /// Recent reports, fleet-wide or for one agent. Memoized per scope;
    /// `limit` shapes the fetch but does not distinguish cache entries.
    pub async fn reports(
        &self,
        agent_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Arc<ReportList>, CoreError> {
        let inner = Arc::clone(&self.inner);
        let query = ReportQuery {
            agent_id: agent_id.map(str::to_owned),
            limit,
        };
        let rx = self
            .inner
            .reports
            .get(&reports_key(agent_id), move || async move {
                inner.client.list_reports(&query).await.map_err(CoreError::from)
            });
        self.resolve(rx).await
    }

    /// Full report payload. Reports are immutable once produced, so this
    /// is a direct fetch with no cache entry to invalidate.
    pub async fn report(&self, report_id: &str) -> Result<ReportDetail, CoreError> {
        let result = self
            .inner
            .client
            .get_report(report_id)
            .await
            .map_err(CoreError::from);
        self.guard(result)
    }

    // ── Explicit refresh ─────────────────────────────────────────────

    pub async fn refresh_agents(&self) -> Result<Arc<AgentList>, CoreError> {
        self.inner.agents.invalidate(AGENTS_KEY);
        self.agents().await
    }

    pub async fn refresh_agent(&self, agent_id: &str) -> Result<Arc<Agent>, CoreError> {
        self.inner.agent.invalidate(&agent_key(agent_id));
        self.agent(agent_id).await
    }

    pub async fn refresh_reports(
        &self,
        agent_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Arc<ReportList>, CoreError> {
        self.inner.reports.invalidate(&reports_key(agent_id));
        self.reports(agent_id, limit).await
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Dispatch a mutating command.
    ///
    /// Invalidation happens only after the server acknowledges: a
    /// per-agent scan drops that agent's report scopes, a fleet-wide scan
    /// drops every cached agent and report entry. On failure every cache
    /// entry stays put.
    pub async fn execute(&self, command: Command) -> Result<CommandReceipt, CoreError> {
        match command {
            Command::TriggerScan { agent_id } => {
                let result = self
                    .inner
                    .client
                    .trigger_scan(&agent_id)
                    .await
                    .map_err(CoreError::from);
                self.guard(result)?;
                debug!(agent_id, "scan acknowledged");

                let mut dropped = Vec::new();
                for key in [reports_key(Some(&agent_id)), reports_key(None)] {
                    if self.inner.reports.invalidate(&key) {
                        dropped.push(key);
                    }
                }
                Ok(CommandReceipt::new(dropped))
            }
            Command::TriggerScanAll => {
                let result = self
                    .inner
                    .client
                    .trigger_scan_all()
                    .await
                    .map_err(CoreError::from);
                self.guard(result)?;
                debug!("fleet-wide scan acknowledged");

                let mut dropped = self.inner.agents.invalidate_all();
                dropped.extend(self.inner.agent.invalidate_all());
                dropped.extend(self.inner.reports.invalidate_all());
                Ok(CommandReceipt::new(dropped))
            }
        }
    }

    // ── Cross-cutting plumbing ───────────────────────────────────────

    async fn resolve<T>(
        &self,
        rx: tokio::sync::watch::Receiver<crate::cache::CacheEntry<T>>,
    ) -> Result<Arc<T>, CoreError> {
        let result = crate::cache::resolve(rx).await.map_err(|e| (*e).clone());
        self.guard(result)
    }

    /// Rejected-token handling: any operation that surfaces
    /// [`CoreError::AuthRejected`] ends the session, discards cached
    /// data, and forces the view back to login.
    fn guard<T>(&self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(err) = &result {
            if err.is_auth_rejected() {
                warn!("server rejected session token, forcing logout");
                self.drop_caches();
                if let Err(e) = self.inner.session.clear() {
                    warn!(error = %e, "failed to clear persisted token");
                }
                self.inner.router.on_logout();
            }
        }
        result
    }

    fn drop_caches(&self) {
        self.inner.agents.invalidate_all();
        self.inner.agent.invalidate_all();
        self.inner.reports.invalidate_all();
    }
}
