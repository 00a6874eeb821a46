//! The chat view: requests client secrets from the session endpoint on
//! demand and shows one of three states (initializing, error, ready).
//!
//! The browser flavor is the static page in `index.html`, served by
//! [`server`](crate::server). The terminal flavor is [`run_terminal`].

pub mod render;
pub mod state;
pub mod supplier;
pub mod widget;

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::events::{Event, EventBus};
use crate::spinner::Spinner;

use render::{LOADING_MESSAGE, render};
use state::ViewState;
use supplier::ClientSecretSupplier;
use widget::ChatWidget;

/// Interactive terminal chat view. Returns on `quit`, EOF, or Ctrl+C.
pub async fn run_terminal(supplier: Arc<dyn ClientSecretSupplier>) -> Result<()> {
    let events = Arc::new(EventBus::default());
    tokio::spawn(log_events(events.subscribe()));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    let mut widget = ChatWidget::new(supplier.clone(), events.clone());
    let mut state = with_spinner(widget.connect()).await;

    loop {
        print!("{}", render(&state, widget.client_secret()));
        if state == ViewState::Ready {
            print!("\nchat> ");
        }
        io::stdout().flush()?;

        let Some(line) = next_line(&mut lines).await? else {
            break;
        };
        let input = line.trim();
        if input == "quit" || input == "exit" {
            break;
        }

        state = match state {
            // Retry is a full reload: a fresh widget with no prior session.
            ViewState::Error { .. } => {
                widget = ChatWidget::new(supplier.clone(), events.clone());
                with_spinner(widget.connect()).await
            }
            _ if input == "refresh" => with_spinner(widget.refresh()).await,
            current => {
                if !input.is_empty() {
                    println!("unknown command: {input}");
                }
                current
            }
        };
    }

    println!("goodbye.");
    Ok(())
}

/// Show the loading indicator while `fut` runs.
async fn with_spinner(fut: impl Future<Output = ViewState>) -> ViewState {
    let spinner = Spinner::start(LOADING_MESSAGE);
    let state = fut.await;
    spinner.stop().await;
    state
}

/// Next stdin line, or `None` on EOF or Ctrl+C.
async fn next_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    tokio::select! {
        result = lines.next_line() => Ok(result?),
        _ = tokio::signal::ctrl_c() => {
            println!();
            Ok(None)
        }
    }
}

async fn log_events(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(Event::Error { message }) => tracing::warn!(%message, "chat widget error"),
            Ok(event) => tracing::debug!(?event, "chat widget event"),
            Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "event listener lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
