// Wire types for the fleet-management REST API.
//
// Shapes mirror the server's response schemas. Fields use
// `#[serde(default)]` where the server marks them optional, and status
// enums carry an `Other` catch-all so new server-side values never break
// deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Agent ────────────────────────────────────────────────────────────

/// Reported liveness of an endpoint agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgentStatus {
    Online,
    Offline,
    Unknown,
    /// Catch-all for values this client doesn't know about.
    #[serde(other)]
    Other,
}

/// A registered endpoint agent, as returned by `/api/agents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub hostname: String,
    pub os: String,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    pub status: AgentStatus,
    pub last_seen: DateTime<Utc>,
    pub registered_at: DateTime<Utc>,
    /// Free-form registration metadata, if the agent supplied any.
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Response envelope for `GET /api/agents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentList {
    pub total: i64,
    pub agents: Vec<Agent>,
}

// ── Report ───────────────────────────────────────────────────────────

/// Overall outcome of one compliance scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportStatus {
    Pass,
    Fail,
    Warn,
    #[serde(other)]
    Other,
}

/// Summary row for one scan report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub agent_id: String,
    pub timestamp: DateTime<Utc>,
    /// Scan mode. Absent means "standard".
    #[serde(default)]
    pub mode: Option<String>,
    pub overall_status: ReportStatus,
    /// Fraction of checks passed, in `[0, 1]`.
    pub overall_score: f64,
}

/// Response envelope for `GET /api/reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportList {
    pub total: i64,
    pub reports: Vec<Report>,
}

/// Full report with the raw check payload, from `GET /api/reports/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDetail {
    pub id: String,
    pub agent_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub mode: Option<String>,
    pub overall_status: ReportStatus,
    pub overall_score: f64,
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Filter for `GET /api/reports`. Ordering (most-recent-first) and
/// truncation are contracts of the remote API; nothing is re-sorted or
/// re-filtered client-side.
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    /// Scope to one agent.
    pub agent_id: Option<String>,
    /// Cap the number of returned reports.
    pub limit: Option<u32>,
}

impl ReportQuery {
    /// Reports for a single agent, unbounded.
    pub fn for_agent(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            limit: None,
        }
    }

    /// The latest `limit` reports across the whole fleet.
    pub fn latest(limit: u32) -> Self {
        Self {
            agent_id: None,
            limit: Some(limit),
        }
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref agent_id) = self.agent_id {
            params.push(("agent_id", agent_id.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Reply from `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn agent_deserializes_with_absent_optionals() {
        let agent: Agent = serde_json::from_value(json!({
            "id": "a1",
            "hostname": "web-01",
            "os": "Linux",
            "status": "online",
            "last_seen": "2025-06-01T12:00:00Z",
            "registered_at": "2025-01-15T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(agent.ip, None);
        assert_eq!(agent.os_version, None);
        assert_eq!(agent.status, AgentStatus::Online);
    }

    #[test]
    fn unknown_status_maps_to_other() {
        let agent: Agent = serde_json::from_value(json!({
            "id": "a1",
            "hostname": "web-01",
            "os": "Linux",
            "status": "degraded",
            "last_seen": "2025-06-01T12:00:00Z",
            "registered_at": "2025-01-15T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(agent.status, AgentStatus::Other);
    }

    #[test]
    fn report_query_params() {
        let q = ReportQuery {
            agent_id: Some("a1".into()),
            limit: Some(50),
        };
        assert_eq!(
            q.to_params(),
            vec![("agent_id", "a1".to_string()), ("limit", "50".to_string())]
        );

        assert!(ReportQuery::default().to_params().is_empty());
    }

    #[test]
    fn status_display_is_lowercase() {
        assert_eq!(AgentStatus::Online.to_string(), "online");
        assert_eq!(ReportStatus::Pass.to_string(), "pass");
    }
}
