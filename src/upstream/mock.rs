use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::GatewayError;

use super::{SessionApi, SessionRequest, UpstreamReply};

/// A scripted upstream for tests. Returns pre-defined replies in order and
/// records every request it sees.
pub struct MockSessionApi {
    replies: Vec<Result<UpstreamReply, String>>,
    index: AtomicUsize,
    seen: Mutex<Vec<(String, SessionRequest)>>,
}

impl MockSessionApi {
    pub fn new(replies: Vec<Result<UpstreamReply, String>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `status` and `body`.
    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        Self::new(vec![Ok(UpstreamReply {
            status,
            body: body.into(),
        })])
    }

    /// Fail the first call as a transport error would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Err(message.into())])
    }

    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// `(api_key, request)` pairs in call order.
    pub fn requests(&self) -> Vec<(String, SessionRequest)> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SessionApi for MockSessionApi {
    async fn create_session(
        &self,
        api_key: &str,
        request: &SessionRequest,
    ) -> Result<UpstreamReply, GatewayError> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((api_key.to_string(), request.clone()));
        }
        // A single scripted reply is repeated for every call.
        let reply = if self.replies.len() == 1 {
            self.replies.first()
        } else {
            self.replies.get(i)
        };
        match reply {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(message)) => Err(GatewayError::internal(message.clone())),
            None => Err(GatewayError::internal(format!(
                "MockSessionApi: no more replies (called {} times)",
                i + 1
            ))),
        }
    }
}
