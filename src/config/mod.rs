//! Gateway configuration, resolved once at startup.
//!
//! The handler never reads the process environment itself: build a
//! [`GatewayConfig`] with [`GatewayConfig::from_env`] (or
//! [`GatewayConfig::from_lookup`] in tests) and hand it to the
//! [`SessionService`](crate::session::SessionService).

use crate::consts::{
    DEFAULT_CHATKIT_BASE, ENV_API_BASE, ENV_API_KEY, ENV_WORKFLOW_ID, ENV_WORKFLOW_ID_LEGACY,
    SESSIONS_PATH,
};
use crate::error::GatewayError;

const API_KEY_HINT: &str = "Set OPENAI_API_KEY in the gateway's environment";
const WORKFLOW_ID_HINT: &str =
    "Set CHATKIT_WORKFLOW_ID to the ID of your published Agent Builder workflow";

/// Settings the session endpoint needs. Missing required values are kept as
/// `None` and reported per request, so the server still starts without them.
#[derive(Clone, PartialEq)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub workflow_id: Option<String>,
    pub api_base: String,
}

impl GatewayConfig {
    pub fn new(api_key: Option<String>, workflow_id: Option<String>) -> Self {
        Self {
            api_key: non_blank(api_key),
            workflow_id: non_blank(workflow_id),
            api_base: DEFAULT_CHATKIT_BASE.to_string(),
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (env, map, test fixture).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| non_blank(lookup(key));
        let workflow_id = get(ENV_WORKFLOW_ID).or_else(|| get(ENV_WORKFLOW_ID_LEGACY));
        let mut config = Self::new(get(ENV_API_KEY), workflow_id);
        if let Some(base) = get(ENV_API_BASE) {
            config = config.with_api_base(base);
        }
        config
    }

    /// Override the upstream base URL. A trailing `/` is dropped.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = non_blank(Some(workflow_id.into()));
        self
    }

    pub fn require_api_key(&self) -> Result<&str, GatewayError> {
        self.api_key
            .as_deref()
            .ok_or(GatewayError::MissingConfig {
                name: ENV_API_KEY,
                hint: API_KEY_HINT,
            })
    }

    pub fn require_workflow_id(&self) -> Result<&str, GatewayError> {
        self.workflow_id
            .as_deref()
            .ok_or(GatewayError::MissingConfig {
                name: ENV_WORKFLOW_ID,
                hint: WORKFLOW_ID_HINT,
            })
    }

    /// Full URL of the upstream session-creation endpoint.
    pub fn sessions_url(&self) -> String {
        format!("{}{}", self.api_base, SESSIONS_PATH)
    }
}

// Hand-written so the secret never ends up in logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("workflow_id", &self.workflow_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Blank values count as unset. Kept values are stored untrimmed.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
