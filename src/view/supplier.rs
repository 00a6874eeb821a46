use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Message used when the gateway's error body carries no `error` field.
pub const FALLBACK_ERROR: &str = "Failed to create session";

#[derive(Debug, Error)]
pub enum SupplierError {
    /// The gateway answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("session endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session response has no client_secret")]
    MissingSecret,
}

/// Hands the widget a client secret whenever it needs one.
#[async_trait]
pub trait ClientSecretSupplier: Send + Sync {
    /// `existing` is the secret being refreshed, `None` for a new session.
    async fn get_client_secret(&self, existing: Option<&str>) -> Result<String, SupplierError>;
}

/// Fetches client secrets from the gateway's session endpoint.
pub struct SessionClient {
    endpoint: String,
    http: reqwest::Client,
}

impl SessionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Build on an existing client, e.g. one with a cookie store so the
    /// pseudonymous identity survives refreshes.
    pub fn with_client(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    client_secret: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

#[async_trait]
impl ClientSecretSupplier for SessionClient {
    async fn get_client_secret(&self, existing: Option<&str>) -> Result<String, SupplierError> {
        if existing.is_some() {
            tracing::info!("refreshing session");
        } else {
            tracing::info!("creating new session");
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // Unparseable error bodies still surface as a rejection.
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            tracing::error!(status = status.as_u16(), %message, "session creation failed");
            return Err(SupplierError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let data: SessionResponse = resp.json().await?;
        tracing::info!("session created");
        data.client_secret.ok_or(SupplierError::MissingSecret)
    }
}
