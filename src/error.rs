//! Error taxonomy of the session endpoint and its JSON error body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hint attached to unexpected local failures.
pub const INTERNAL_HINT: &str = "Check the gateway logs for more details";

/// Everything that can go wrong while creating a session.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required setting is absent. Fatal to the request, never retried.
    #[error("Missing {name} environment variable")]
    MissingConfig {
        name: &'static str,
        hint: &'static str,
    },

    /// The upstream API answered with a non-success status.
    #[error("Failed to create session: {status}")]
    Upstream {
        status: u16,
        details: String,
        hint: Option<&'static str>,
    },

    /// Network failure, malformed JSON, or anything else unexpected.
    #[error("Internal server error")]
    Internal { details: String },
}

/// Wire shape of every error response: `{ error, details?, hint? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl GatewayError {
    pub fn internal(details: impl Into<String>) -> Self {
        let details = details.into();
        Self::Internal {
            details: if details.is_empty() {
                "Unknown error".to_string()
            } else {
                details
            },
        }
    }

    /// HTTP status reported to the caller.
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingConfig { .. } | Self::Internal { .. } => 500,
            Self::Upstream { status, .. } => *status,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let error = self.to_string();
        match self {
            Self::MissingConfig { hint, .. } => ErrorBody {
                error,
                details: None,
                hint: Some(hint.to_string()),
            },
            // Upstream errors always carry a hint field, empty when unclassified.
            Self::Upstream { details, hint, .. } => ErrorBody {
                error,
                details: Some(details.clone()),
                hint: Some(hint.unwrap_or_default().to_string()),
            },
            Self::Internal { details } => ErrorBody {
                error,
                details: Some(details.clone()),
                hint: Some(INTERNAL_HINT.to_string()),
            },
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err.to_string())
    }
}
