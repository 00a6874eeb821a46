//! Startup banners for the gateway and the terminal chat view.

use crate::config::GatewayConfig;

/// Startup information for `serve`.
pub struct ServeInfo<'a> {
    pub bind: &'a str,
    pub config: &'a GatewayConfig,
}

pub fn serve_banner(info: &ServeInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║         A I   A S S I S T A N T       ║
   ║        chatkit session gateway        ║
   ╚═══════════════════════════════════════╝

   version   {}
   listen    http://{}
   upstream  {}
   workflow  {}
   api key   {}
"#,
        env!("CARGO_PKG_VERSION"),
        info.bind,
        info.config.api_base,
        presence(info.config.workflow_id.is_some()),
        presence(info.config.api_key.is_some()),
    )
}

pub fn chat_banner(endpoint: &str) -> String {
    format!(
        r#"
   AI Assistant  v{}
   endpoint  {}
"#,
        env!("CARGO_PKG_VERSION"),
        endpoint,
    )
}

fn presence(set: bool) -> &'static str {
    if set { "configured ✓" } else { "MISSING" }
}
