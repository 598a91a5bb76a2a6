#![allow(clippy::unwrap_used)]
// Integration tests for `FleetClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fleetwatch_api::{Error, FleetClient, ReportQuery, TokenCell};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with_token(token: &str) -> (MockServer, FleetClient) {
    let server = MockServer::start().await;
    let cell = TokenCell::new();
    cell.set(SecretString::from(token.to_string()));
    let client = FleetClient::from_reqwest(&server.uri(), reqwest::Client::new(), cell).unwrap();
    (server, client)
}

fn sample_agent(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "hostname": "web-01",
        "os": "Linux",
        "os_version": "6.8",
        "ip": "10.0.0.5",
        "status": "online",
        "last_seen": "2025-06-15T10:30:00Z",
        "registered_at": "2025-01-02T08:00:00Z"
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;
    let client =
        FleetClient::from_reqwest(&server.uri(), reqwest::Client::new(), TokenCell::new()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let secret: SecretString = "test-password".to_string().into();
    let token = client.login("admin", &secret).await.unwrap();

    assert_eq!(token.access_token, "tok-1");
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    let client =
        FleetClient::from_reqwest(&server.uri(), reqwest::Client::new(), TokenCell::new()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect credentials"})),
        )
        .mount(&server)
        .await;

    let secret: SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::AuthRejected)),
        "expected AuthRejected, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unauthenticated_call_never_hits_network() {
    // Zero mocks mounted: a request reaching the server would 404 instead.
    let server = MockServer::start().await;
    let client =
        FleetClient::from_reqwest(&server.uri(), reqwest::Client::new(), TokenCell::new()).unwrap();

    let result = client.list_agents().await;

    assert!(
        matches!(result, Err(Error::Unauthenticated)),
        "expected Unauthenticated, got: {result:?}"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bearer_header_attached() {
    let (server, client) = setup_with_token("tok-xyz").await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .and(header("authorization", "Bearer tok-xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 0,
            "agents": []
        })))
        .mount(&server)
        .await;

    let list = client.list_agents().await.unwrap();
    assert_eq!(list.total, 0);
}

// ── Agents ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_agents() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "agents": [sample_agent("a1")]
        })))
        .mount(&server)
        .await;

    let list = client.list_agents().await.unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.agents.len(), 1);
    assert_eq!(list.agents[0].id, "a1");
    assert_eq!(list.agents[0].hostname, "web-01");
    assert_eq!(list.agents[0].ip.as_deref(), Some("10.0.0.5"));
}

#[tokio::test]
async fn test_get_agent() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/agents/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_agent("a1")))
        .mount(&server)
        .await;

    let agent = client.get_agent("a1").await.unwrap();
    assert_eq!(agent.id, "a1");
    assert_eq!(agent.os, "Linux");
}

#[tokio::test]
async fn test_get_agent_not_found() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/agents/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Agent not found"})))
        .mount(&server)
        .await;

    let result = client.get_agent("missing").await;

    match result {
        Err(Error::RequestFailed { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Agent not found");
        }
        other => panic!("expected RequestFailed, got: {other:?}"),
    }
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_reports_with_filter() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .and(query_param("agent_id", "a1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "reports": [{
                "id": "r1",
                "agent_id": "a1",
                "timestamp": "2025-06-15T11:00:00Z",
                "overall_status": "pass",
                "overall_score": 0.873
            }]
        })))
        .mount(&server)
        .await;

    let query = ReportQuery {
        agent_id: Some("a1".into()),
        limit: Some(10),
    };
    let list = client.list_reports(&query).await.unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.reports[0].id, "r1");
    assert_eq!(list.reports[0].mode, None);
    assert!((list.reports[0].overall_score - 0.873).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_get_report_detail() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/reports/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1",
            "agent_id": "a1",
            "timestamp": "2025-06-15T11:00:00Z",
            "mode": "deep",
            "overall_status": "warn",
            "overall_score": 0.5,
            "payload": { "firewall": "pass", "patching": "warn" }
        })))
        .mount(&server)
        .await;

    let detail = client.get_report("r1").await.unwrap();
    assert_eq!(detail.mode.as_deref(), Some("deep"));
    assert_eq!(detail.payload.len(), 2);
}

// ── Scan commands ───────────────────────────────────────────────────

#[tokio::test]
async fn test_trigger_scan_ignores_body() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("POST"))
        .and(path("/api/agents/a1/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "command_id": "c1"
        })))
        .mount(&server)
        .await;

    client.trigger_scan("a1").await.unwrap();
}

#[tokio::test]
async fn test_trigger_scan_all_server_error() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("POST"))
        .and(path("/api/agents/scan"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let result = client.trigger_scan_all().await;

    match result {
        Err(Error::RequestFailed { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal error");
        }
        other => panic!("expected RequestFailed, got: {other:?}"),
    }
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_forbidden_maps_to_auth_rejected() {
    let (server, client) = setup_with_token("tok-stale").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Inactive user"})))
        .mount(&server)
        .await;

    let result = client.list_agents().await;
    assert!(matches!(result, Err(Error::AuthRejected)));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup_with_token("tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_agents().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization, got: {result:?}"
    );
}

#[tokio::test]
async fn test_multibyte_garbage_body_reported_without_panic() {
    let (server, client) = setup_with_token("tok-1").await;

    // 301 bytes of non-JSON; byte 200 of the error-preview window falls
    // inside a two-byte character.
    let garbage = format!("x{}", "α".repeat(150));
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_string(garbage.clone()))
        .mount(&server)
        .await;

    let result = client.list_agents().await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, garbage),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}
