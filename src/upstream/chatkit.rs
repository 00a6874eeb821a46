use async_trait::async_trait;

use crate::consts::{BETA_HEADER, BETA_VALUE};
use crate::error::GatewayError;

use super::{SessionApi, SessionRequest, UpstreamReply};

/// Calls the hosted ChatKit sessions API over HTTPS.
pub struct ChatKitClient {
    url: String,
    http: reqwest::Client,
}

impl ChatKitClient {
    /// `url` is the full sessions endpoint, see
    /// [`GatewayConfig::sessions_url`](crate::config::GatewayConfig::sessions_url).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SessionApi for ChatKitClient {
    async fn create_session(
        &self,
        api_key: &str,
        request: &SessionRequest,
    ) -> Result<UpstreamReply, GatewayError> {
        tracing::debug!(url = %self.url, "calling upstream sessions API");

        let resp = self
            .http
            .post(&self.url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {api_key}"))
            .header(BETA_HEADER, BETA_VALUE)
            .json(request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(UpstreamReply { status, body })
    }
}
