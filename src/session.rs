//! The session endpoint, independent of any HTTP framework.
//!
//! [`SessionService::create`] turns an optional `Cookie` header into a
//! [`SessionReply`]: check configuration, resolve the pseudonymous user,
//! call the upstream API once, relay the outcome. A freshly minted identity
//! cookie rides along on every reply produced after identity resolution,
//! failures included, so a retry reuses the same user.

use std::sync::Arc;

use serde_json::Value;

use crate::config::GatewayConfig;
use crate::consts::{REDACT_KEEP, redact};
use crate::error::GatewayError;
use crate::hints::hint_for;
use crate::identity::{self, Identity};
use crate::upstream::{SessionApi, SessionRequest, UpstreamReply};

/// Status reported when the upstream answers with a code HTTP cannot carry.
const FALLBACK_STATUS: u16 = 502;

/// Everything the HTTP layer needs to write a response.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReply {
    pub status: u16,
    pub body: Value,
    pub set_cookie: Option<String>,
}

impl SessionReply {
    fn from_error(err: &GatewayError, set_cookie: Option<String>) -> Self {
        let body = serde_json::to_value(err.body()).unwrap_or_else(|_| {
            serde_json::json!({ "error": err.to_string() })
        });
        Self {
            status: err.status(),
            body,
            set_cookie,
        }
    }
}

/// Brokers session creation between the browser and the upstream API.
#[derive(Clone)]
pub struct SessionService {
    config: GatewayConfig,
    api: Arc<dyn SessionApi>,
}

impl SessionService {
    pub fn new(config: GatewayConfig, api: Arc<dyn SessionApi>) -> Self {
        Self { config, api }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Handle one session-creation request.
    pub async fn create(&self, cookie_header: Option<&str>) -> SessionReply {
        tracing::info!(
            api_key_present = self.config.api_key.is_some(),
            workflow_id_present = self.config.workflow_id.is_some(),
            "starting session creation"
        );

        let (api_key, workflow_id) = match self.preconditions() {
            Ok(pair) => pair,
            Err(err) => {
                tracing::error!(error = %err, "session endpoint is not configured");
                return SessionReply::from_error(&err, None);
            }
        };

        let identity = identity::resolve(cookie_header);
        tracing::info!(
            user = %redact(&identity.user_id, REDACT_KEEP),
            workflow = %redact(workflow_id, REDACT_KEEP),
            new_user = identity.is_new(),
            "creating session"
        );

        let Identity {
            user_id,
            set_cookie,
        } = identity;
        let request = SessionRequest::new(workflow_id, user_id);

        match self.call_upstream(api_key, &request).await {
            Ok(body) => SessionReply {
                status: 200,
                body,
                set_cookie,
            },
            Err(err) => SessionReply::from_error(&err, set_cookie),
        }
    }

    fn preconditions(&self) -> Result<(&str, &str), GatewayError> {
        let api_key = self.config.require_api_key()?;
        let workflow_id = self.config.require_workflow_id()?;
        Ok((api_key, workflow_id))
    }

    async fn call_upstream(
        &self,
        api_key: &str,
        request: &SessionRequest,
    ) -> Result<Value, GatewayError> {
        let reply = self.api.create_session(api_key, request).await.inspect_err(|err| {
            tracing::error!(error = %err, "upstream call failed");
        })?;
        tracing::info!(status = reply.status, "upstream responded");

        if !reply.is_success() {
            tracing::error!(status = reply.status, details = %reply.body, "upstream rejected session");
            return Err(upstream_error(reply));
        }

        let body: Value = serde_json::from_str(&reply.body).inspect_err(|err| {
            tracing::error!(error = %err, "upstream returned malformed JSON");
        })?;
        let session_id = body.get("id").and_then(Value::as_str).unwrap_or("-");
        tracing::info!(session_id, "session created");
        Ok(body)
    }
}

fn upstream_error(reply: UpstreamReply) -> GatewayError {
    let status = if (100..=999).contains(&reply.status) {
        reply.status
    } else {
        FALLBACK_STATUS
    };
    GatewayError::Upstream {
        status,
        details: reply.body,
        hint: hint_for(status),
    }
}
