//! Pseudonymous per-browser identity carried in a cookie.
//!
//! Everything here is a pure function of the incoming `Cookie` header, so it
//! can be tested without any HTTP plumbing.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use uuid::Uuid;

use crate::consts::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, USER_ID_PREFIX};

/// Characters escaped in cookie values. Matches `encodeURIComponent`.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The user id for this request, plus the `Set-Cookie` value to send when
/// the id was minted just now.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
    pub set_cookie: Option<String>,
}

impl Identity {
    pub fn is_new(&self) -> bool {
        self.set_cookie.is_some()
    }
}

/// Reuse the id from the cookie header, or mint a fresh one.
pub fn resolve(cookie_header: Option<&str>) -> Identity {
    if let Some(user_id) = cookie_header.and_then(|h| cookie_value(h, SESSION_COOKIE_NAME)) {
        return Identity {
            user_id,
            set_cookie: None,
        };
    }

    let user_id = mint_user_id();
    let set_cookie = Some(serialize_session_cookie(&user_id));
    Identity {
        user_id,
        set_cookie,
    }
}

/// `user_` followed by a random v4 UUID.
pub fn mint_user_id() -> String {
    format!("{USER_ID_PREFIX}{}", Uuid::new_v4())
}

/// Whether `value` has the shape produced by [`mint_user_id`].
pub fn is_minted_user_id(value: &str) -> bool {
    value
        .strip_prefix(USER_ID_PREFIX)
        .is_some_and(|rest| Uuid::parse_str(rest).is_ok())
}

/// Find `name` in a `Cookie` header and percent-decode its value.
///
/// Pairs are separated by `"; "`. Empty values are treated as absent.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split("; ")
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, raw)| {
            let raw = raw.split(';').next().unwrap_or_default();
            percent_decode_str(raw).decode_utf8_lossy().into_owned()
        })
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a freshly minted id.
pub fn serialize_session_cookie(user_id: &str) -> String {
    format!(
        "{SESSION_COOKIE_NAME}={}; Max-Age={SESSION_COOKIE_MAX_AGE}; Path=/; HttpOnly; SameSite=Lax; Secure",
        utf8_percent_encode(user_id, COOKIE_VALUE)
    )
}
