use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use chatkit_gateway::banner::{ServeInfo, chat_banner, serve_banner};
use chatkit_gateway::config::GatewayConfig;
use chatkit_gateway::consts::{DEFAULT_BIND, DEFAULT_ENDPOINT};
use chatkit_gateway::logging::{LogFormat, init_logging};
use chatkit_gateway::server::{self, AppState};
use chatkit_gateway::session::SessionService;
use chatkit_gateway::upstream::chatkit::ChatKitClient;
use chatkit_gateway::view::{self, supplier::SessionClient};

#[derive(Parser)]
#[command(
    name = "chatkit-gateway",
    version,
    about = "Session gateway and chat view for ChatKit workflows.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,

    /// Log output format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the session endpoint and the browser chat page (default)
    Serve(ServeArgs),
    /// Open the terminal chat view against a running gateway
    Chat {
        /// Session endpoint URL
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "CHATKIT_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Upstream API base URL (overrides CHATKIT_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Workflow ID (overrides CHATKIT_WORKFLOW_ID)
    #[arg(long)]
    workflow_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    match cli.command {
        Some(Command::Chat { endpoint }) => chat(endpoint).await,
        Some(Command::Serve(args)) => serve(args).await,
        None => serve(cli.serve).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = GatewayConfig::from_env();
    if let Some(base) = args.api_base {
        config = config.with_api_base(base);
    }
    if let Some(workflow_id) = args.workflow_id {
        config = config.with_workflow_id(workflow_id);
    }

    let bind = args.bind;
    print!(
        "{}",
        serve_banner(&ServeInfo {
            bind: &bind.to_string(),
            config: &config,
        })
    );
    if config.api_key.is_none() || config.workflow_id.is_none() {
        tracing::warn!("gateway is missing configuration; session requests will fail with 500");
    }

    let api = Arc::new(ChatKitClient::new(config.sessions_url()));
    let state = AppState::new(SessionService::new(config, api));
    server::serve(bind, state).await
}

async fn chat(endpoint: String) -> anyhow::Result<()> {
    print!("{}", chat_banner(&endpoint));
    let http = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .context("failed to build HTTP client")?;
    let supplier = Arc::new(SessionClient::with_client(endpoint, http));
    view::run_terminal(supplier).await
}
