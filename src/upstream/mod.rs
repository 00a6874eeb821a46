pub mod chatkit;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::GatewayError;

/// Body of the upstream session-creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRequest {
    pub workflow: WorkflowRef,
    pub user: String,
    pub chatkit_configuration: ChatKitConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatKitConfiguration {
    pub file_upload: FileUpload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileUpload {
    pub enabled: bool,
}

impl SessionRequest {
    /// A session for `workflow_id` on behalf of `user`, uploads disabled.
    pub fn new(workflow_id: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            workflow: WorkflowRef {
                id: workflow_id.into(),
            },
            user: user.into(),
            chatkit_configuration: ChatKitConfiguration {
                file_upload: FileUpload { enabled: false },
            },
        }
    }
}

/// Raw upstream answer. The body is left unparsed: error bodies are relayed
/// as text, success bodies are parsed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Whatever creates sessions upstream. A real HTTP client or a test script.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Perform exactly one upstream call. Transport failures are
    /// [`GatewayError::Internal`]; non-2xx statuses are returned as replies.
    async fn create_session(
        &self,
        api_key: &str,
        request: &SessionRequest,
    ) -> Result<UpstreamReply, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_upstream_shape() {
        let request = SessionRequest::new("wf_1", "user_1");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "workflow": { "id": "wf_1" },
                "user": "user_1",
                "chatkit_configuration": { "file_upload": { "enabled": false } }
            })
        );
    }

    #[test]
    fn success_range() {
        let reply = |status| UpstreamReply {
            status,
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(201).is_success());
        assert!(!reply(199).is_success());
        assert!(!reply(301).is_success());
        assert!(!reply(404).is_success());
    }
}
