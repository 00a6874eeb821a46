//! HTTP surface: the session endpoint, the browser chat page, and a health probe.

use std::borrow::Cow;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::consts::CREATE_SESSION_PATH;
use crate::session::{SessionReply, SessionService};

/// Browser chat page, embedded at compile time.
pub const INDEX_HTML: &str = include_str!("view/index.html");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
}

impl AppState {
    pub fn new(sessions: SessionService) -> Self {
        Self { sessions }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route(CREATE_SESSION_PATH, post(create_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    serve_on(listener, state).await
}

/// Serve on an already bound listener (tests bind `127.0.0.1:0`).
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server runtime failure")
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/create-session`. The request body is ignored.
async fn create_session(State(state): State<AppState>, headers: HeaderMap) -> SessionReply {
    let cookie = cookie_header(&headers);
    state.sessions.create(cookie.as_deref()).await
}

/// All `Cookie` headers folded into one (HTTP/2 may split them). Bytes
/// outside ASCII are decoded lossily.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let parts: Vec<Cow<'_, str>> = headers
        .get_all(header::COOKIE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

impl IntoResponse for SessionReply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut response = (status, Json(self.body)).into_response();
        if let Some(cookie) = self.set_cookie {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().insert(header::SET_COOKIE, value);
                }
                Err(err) => tracing::warn!(error = %err, "dropping unencodable session cookie"),
            }
        }
        response
    }
}
