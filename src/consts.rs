//! Project-wide constants.

/// Default upstream host when `CHATKIT_API_BASE` is not set.
pub const DEFAULT_CHATKIT_BASE: &str = "https://api.openai.com";

/// Upstream path that creates a ChatKit session.
pub const SESSIONS_PATH: &str = "/v1/chatkit/sessions";

/// Beta opt-in header required by the ChatKit sessions API.
pub const BETA_HEADER: &str = "OpenAI-Beta";
pub const BETA_VALUE: &str = "chatkit_beta=v1";

/// Cookie carrying the pseudonymous user id.
pub const SESSION_COOKIE_NAME: &str = "chatkit_session_id";

/// 30 days, in seconds.
pub const SESSION_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 30;

/// Prefix of every minted user id.
pub const USER_ID_PREFIX: &str = "user_";

/// Route served by the gateway for session creation.
pub const CREATE_SESSION_PATH: &str = "/api/create-session";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_WORKFLOW_ID: &str = "CHATKIT_WORKFLOW_ID";
/// Legacy name still honored when `CHATKIT_WORKFLOW_ID` is unset.
pub const ENV_WORKFLOW_ID_LEGACY: &str = "NEXT_PUBLIC_CHATKIT_WORKFLOW_ID";
pub const ENV_API_BASE: &str = "CHATKIT_API_BASE";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Session endpoint the terminal client talks to by default.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/create-session";

/// Number of leading characters kept by [`redact`].
pub const REDACT_KEEP: usize = 15;

/// Shorten an identifier for logging (e.g. `user_3f2a9c1b-7...`).
/// Values no longer than `keep` characters are returned unchanged.
pub fn redact(value: &str, keep: usize) -> String {
    match value.char_indices().nth(keep) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}
