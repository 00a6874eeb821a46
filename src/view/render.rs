//! Terminal rendering of the three chat view states.

use super::state::{TROUBLESHOOTING, ViewState};

/// Text shown next to the spinner while connecting.
pub const LOADING_MESSAGE: &str = "Connecting to your agent...";

/// Render a view state as terminal text. `secret` is only used when ready.
pub fn render(state: &ViewState, secret: Option<&str>) -> String {
    match state {
        ViewState::Initializing => format!("AI Assistant\n{LOADING_MESSAGE}\n"),
        ViewState::Error { message } => render_error(message),
        ViewState::Ready => render_ready(secret),
    }
}

fn render_error(message: &str) -> String {
    let mut out = String::from("\n  ⚠  Connection Error\n\n");
    out.push_str(&format!("  {message}\n\n"));
    out.push_str("  Troubleshooting:\n");
    for item in TROUBLESHOOTING {
        out.push_str(&format!("    • {item}\n"));
    }
    out.push_str("\n  Press Enter to retry, or type quit to exit.\n");
    out
}

fn render_ready(secret: Option<&str>) -> String {
    format!(
        "\n  ✓ Connected. client secret {}\n  Commands: refresh, quit\n",
        mask_secret(secret.unwrap_or_default())
    )
}

/// Keep the first 6 characters of a secret, hide the rest.
pub fn mask_secret(secret: &str) -> String {
    match secret.char_indices().nth(6) {
        Some((idx, _)) => format!("{}…", &secret[..idx]),
        None => "…".to_string(),
    }
}
