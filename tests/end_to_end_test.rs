//! The gateway and the chat view's credential supplier against a fake
//! upstream, all over real sockets.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use chatkit_gateway::config::GatewayConfig;
use chatkit_gateway::server::{self, AppState};
use chatkit_gateway::session::SessionService;
use chatkit_gateway::upstream::chatkit::ChatKitClient;
use chatkit_gateway::view::supplier::{
    ClientSecretSupplier, FALLBACK_ERROR, SessionClient, SupplierError,
};

/// What the fake upstream saw: (authorization, beta header, body).
type Seen = Arc<Mutex<Vec<(String, String, Value)>>>;

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    body: String,
    seen: Seen,
}

async fn fake_sessions(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    upstream
        .seen
        .lock()
        .unwrap()
        .push((header("authorization"), header("openai-beta"), body));
    (upstream.status, upstream.body.clone())
}

/// Start a fake upstream answering `status` + `body`. Returns its base URL.
async fn spawn_upstream(status: u16, body: &str) -> (String, Seen) {
    let seen: Seen = Arc::default();
    let state = Upstream {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v1/chatkit/sessions", post(fake_sessions))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}"), seen)
}

/// Start the gateway against `config`. Returns the session endpoint URL.
async fn spawn_gateway(config: GatewayConfig) -> String {
    let api = Arc::new(ChatKitClient::new(config.sessions_url()));
    let state = AppState::new(SessionService::new(config, api));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve_on(listener, state));
    format!("http://{addr}/api/create-session")
}

fn config_for(base: &str) -> GatewayConfig {
    GatewayConfig::new(Some("sk-test".to_string()), Some("wf_123".to_string()))
        .with_api_base(base)
}

#[tokio::test]
async fn supplier_resolves_client_secret() {
    let (base, seen) = spawn_upstream(200, r#"{"id":"s1","client_secret":"sec1"}"#).await;
    let endpoint = spawn_gateway(config_for(&base)).await;

    let secret = SessionClient::new(endpoint)
        .get_client_secret(None)
        .await
        .unwrap();
    assert_eq!(secret, "sec1");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, beta, body) = &seen[0];
    assert_eq!(auth, "Bearer sk-test");
    assert_eq!(beta, "chatkit_beta=v1");
    assert_eq!(body["workflow"], json!({"id": "wf_123"}));
    assert_eq!(
        body["chatkit_configuration"],
        json!({"file_upload": {"enabled": false}})
    );
    assert!(body["user"].as_str().unwrap().starts_with("user_"));
}

#[tokio::test]
async fn gateway_relays_exact_upstream_body() {
    let (base, _) = spawn_upstream(200, r#"{"id":"s1","client_secret":"sec1"}"#).await;
    let endpoint = spawn_gateway(config_for(&base)).await;

    let resp = reqwest::Client::new()
        .post(&endpoint)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers().get_all("set-cookie").iter().count(), 1);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"id": "s1", "client_secret": "sec1"}));
}

#[tokio::test]
async fn refresh_takes_same_path() {
    let (base, seen) = spawn_upstream(200, r#"{"id":"s2","client_secret":"sec2"}"#).await;
    let endpoint = spawn_gateway(config_for(&base)).await;

    let secret = SessionClient::new(endpoint)
        .get_client_secret(Some("sec1"))
        .await
        .unwrap();
    assert_eq!(secret, "sec2");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn supplier_surfaces_gateway_error_message() {
    let (base, _) = spawn_upstream(404, "workflow missing").await;
    let endpoint = spawn_gateway(config_for(&base)).await;

    let err = SessionClient::new(endpoint)
        .get_client_secret(None)
        .await
        .unwrap_err();
    match err {
        SupplierError::Rejected { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Failed to create session: 404");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn supplier_reports_missing_configuration() {
    let (base, seen) = spawn_upstream(200, "{}").await;
    let config = GatewayConfig::new(None, Some("wf_123".to_string())).with_api_base(&base);
    let endpoint = spawn_gateway(config).await;

    let err = SessionClient::new(endpoint)
        .get_client_secret(None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing OPENAI_API_KEY environment variable");
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn supplier_falls_back_when_error_field_absent() {
    // Stand-in for the gateway that fails without an `error` field.
    let app = Router::new().route(
        "/api/create-session",
        post(|| async { (StatusCode::BAD_GATEWAY, Json(json!({"detail": "nope"}))) }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let err = SessionClient::new(format!("http://{addr}/api/create-session"))
        .get_client_secret(None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), FALLBACK_ERROR);
}

#[tokio::test]
async fn unreachable_upstream_is_internal_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let endpoint = spawn_gateway(config_for(&dead)).await;

    let resp = reqwest::Client::new()
        .post(&endpoint)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(resp.headers().get_all("set-cookie").iter().count(), 1);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
}
