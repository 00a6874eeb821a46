//! Session gateway and chat view for hosted ChatKit agent workflows.
//!
//! The gateway exchanges a long-lived API key for short-lived client secrets
//! on behalf of browsers, identifying each browser by a pseudonymous cookie.

pub mod banner;
pub mod config;
pub mod consts;
pub mod error;
pub mod events;
pub mod hints;
pub mod identity;
pub mod logging;
pub mod server;
pub mod session;
pub mod spinner;
pub mod upstream;
pub mod view;
