use std::sync::Arc;

use crate::events::{Event, EventBus};

use super::state::{ViewState, WidgetErrors, WidgetStatus};
use super::supplier::ClientSecretSupplier;

/// Terminal stand-in for the embedded chat widget: obtains client secrets
/// through a [`ClientSecretSupplier`] and exposes the status/error signals
/// the view renders from.
pub struct ChatWidget {
    supplier: Arc<dyn ClientSecretSupplier>,
    events: Arc<EventBus>,
    status: WidgetStatus,
    errors: WidgetErrors,
    secret: Option<String>,
}

impl ChatWidget {
    pub fn new(supplier: Arc<dyn ClientSecretSupplier>, events: Arc<EventBus>) -> Self {
        Self {
            supplier,
            events,
            status: WidgetStatus::Initializing,
            errors: WidgetErrors::default(),
            secret: None,
        }
    }

    /// Establish the initial session.
    pub async fn connect(&mut self) -> ViewState {
        self.acquire(None).await
    }

    /// Ask for a new secret for the current session. Without a session this
    /// behaves like [`connect`](Self::connect).
    pub async fn refresh(&mut self) -> ViewState {
        let existing = self.secret.clone();
        self.acquire(existing).await
    }

    async fn acquire(&mut self, existing: Option<String>) -> ViewState {
        match self.supplier.get_client_secret(existing.as_deref()).await {
            Ok(secret) => {
                self.secret = Some(secret);
                self.status = WidgetStatus::Ready;
                self.errors.session = None;
                self.events.emit(if existing.is_some() {
                    Event::SessionRefreshed
                } else {
                    Event::SessionCreated
                });
            }
            Err(err) => {
                let message = err.to_string();
                self.status = WidgetStatus::Failed;
                self.errors.session = Some(message.clone());
                self.events.emit(Event::Error { message });
            }
        }
        self.state()
    }

    pub fn status(&self) -> WidgetStatus {
        self.status
    }

    pub fn errors(&self) -> &WidgetErrors {
        &self.errors
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn state(&self) -> ViewState {
        ViewState::from_signals(self.status, &self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::supplier::SupplierError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted supplier: pops replies in order, records `existing`.
    struct ScriptedSupplier {
        replies: Mutex<Vec<Result<String, String>>>,
        seen: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSupplier {
        fn new(mut replies: Vec<Result<String, String>>) -> Arc<Self> {
            replies.reverse();
            Arc::new(Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ClientSecretSupplier for ScriptedSupplier {
        async fn get_client_secret(
            &self,
            existing: Option<&str>,
        ) -> Result<String, SupplierError> {
            self.seen.lock().unwrap().push(existing.map(str::to_string));
            match self.replies.lock().unwrap().pop() {
                Some(Ok(secret)) => Ok(secret),
                Some(Err(message)) => Err(SupplierError::Rejected {
                    status: 500,
                    message,
                }),
                None => Err(SupplierError::MissingSecret),
            }
        }
    }

    #[test]
    fn starts_initializing() {
        let widget = ChatWidget::new(ScriptedSupplier::new(vec![]), Arc::new(EventBus::default()));
        assert_eq!(widget.status(), WidgetStatus::Initializing);
        assert_eq!(widget.state(), ViewState::Initializing);
        assert!(widget.client_secret().is_none());
    }

    #[tokio::test]
    async fn connect_success_is_ready() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let supplier = ScriptedSupplier::new(vec![Ok("sec1".to_string())]);
        let mut widget = ChatWidget::new(supplier.clone(), bus);

        assert_eq!(widget.connect().await, ViewState::Ready);
        assert_eq!(widget.client_secret(), Some("sec1"));
        assert_eq!(rx.recv().await.unwrap(), Event::SessionCreated);
        assert_eq!(supplier.seen.lock().unwrap().as_slice(), &[None]);
    }

    #[tokio::test]
    async fn connect_failure_shows_error() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let supplier = ScriptedSupplier::new(vec![Err("Missing OPENAI_API_KEY".to_string())]);
        let mut widget = ChatWidget::new(supplier, bus);

        let state = widget.connect().await;
        assert_eq!(
            state,
            ViewState::Error {
                message: "Missing OPENAI_API_KEY".to_string()
            }
        );
        assert_eq!(widget.status(), WidgetStatus::Failed);
        assert!(matches!(rx.recv().await.unwrap(), Event::Error { .. }));
    }

    #[tokio::test]
    async fn refresh_passes_existing_secret() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let supplier =
            ScriptedSupplier::new(vec![Ok("sec1".to_string()), Ok("sec2".to_string())]);
        let mut widget = ChatWidget::new(supplier.clone(), bus);

        widget.connect().await;
        assert_eq!(widget.refresh().await, ViewState::Ready);
        assert_eq!(widget.client_secret(), Some("sec2"));
        assert_eq!(
            supplier.seen.lock().unwrap().as_slice(),
            &[None, Some("sec1".to_string())]
        );
        assert_eq!(rx.recv().await.unwrap(), Event::SessionCreated);
        assert_eq!(rx.recv().await.unwrap(), Event::SessionRefreshed);
    }

    #[tokio::test]
    async fn success_after_failure_clears_error() {
        let supplier = ScriptedSupplier::new(vec![Err("down".to_string()), Ok("sec".to_string())]);
        let mut widget = ChatWidget::new(supplier, Arc::new(EventBus::default()));

        assert!(matches!(widget.connect().await, ViewState::Error { .. }));
        assert_eq!(widget.connect().await, ViewState::Ready);
        assert!(widget.errors().is_empty());
    }
}
