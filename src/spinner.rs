//! Loading indicator shown while the chat view waits for a session.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// A terminal spinner that runs in a background task.
///
/// Writes to stderr so it doesn't interfere with the rendered view on
/// stdout. When stderr is not a terminal (piped, captured by a log
/// collector) the message is printed once instead of animated.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

impl Spinner {
    /// Start a spinner with the given message (e.g. `"Connecting..."`).
    pub fn start(message: &str) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let message = message.to_string();

        let handle = if std::io::stderr().is_terminal() {
            tokio::spawn(animate(message, cancel_rx))
        } else {
            eprintln!("{message}");
            tokio::spawn(async {})
        };

        Self {
            handle,
            cancel: cancel_tx,
        }
    }

    /// Stop the spinner and clear its line.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}

async fn animate(message: String, mut cancel: watch::Receiver<bool>) {
    let mut i = 0;
    loop {
        let frame = FRAMES[i % FRAMES.len()];
        // \r moves to start of line, \x1b[2K clears the line
        eprint!("\x1b[2K\r{frame} {message}");
        let _ = std::io::stderr().flush();

        tokio::select! {
            _ = tokio::time::sleep(INTERVAL) => {}
            _ = cancel.changed() => break,
        }
        i += 1;
    }
    eprint!("\x1b[2K\r");
    let _ = std::io::stderr().flush();
}
