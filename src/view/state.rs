/// Shown when the widget reports an error without a message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to connect to AI agent";

/// Static checklist displayed next to connection errors.
pub const TROUBLESHOOTING: &[&str] = &[
    "Check that OPENAI_API_KEY is set",
    "Check that CHATKIT_WORKFLOW_ID is set",
    "Verify your workflow is published in Agent Builder",
    "Ensure API key and workflow are in the same project",
];

/// Connection status signalled by the chat widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetStatus {
    /// No session established yet.
    Initializing,
    Ready,
    /// The last attempt to establish a session failed.
    Failed,
}

/// Error signals of the chat widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetErrors {
    /// Session establishment failed (e.g. the gateway refused).
    pub session: Option<String>,
    /// The widget itself failed to integrate.
    pub integration: Option<String>,
}

impl WidgetErrors {
    pub fn is_empty(&self) -> bool {
        self.session.is_none() && self.integration.is_none()
    }
}

/// What the chat view displays. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Initializing,
    Error { message: String },
    Ready,
}

impl ViewState {
    /// Initializing wins over errors; a session error wins over an
    /// integration error.
    pub fn from_signals(status: WidgetStatus, errors: &WidgetErrors) -> Self {
        if status == WidgetStatus::Initializing {
            return ViewState::Initializing;
        }
        match errors.session.as_ref().or(errors.integration.as_ref()) {
            Some(message) if !message.is_empty() => ViewState::Error {
                message: message.clone(),
            },
            Some(_) => ViewState::Error {
                message: DEFAULT_ERROR_MESSAGE.to_string(),
            },
            None if status == WidgetStatus::Failed => ViewState::Error {
                message: DEFAULT_ERROR_MESSAGE.to_string(),
            },
            None => ViewState::Ready,
        }
    }
}
